use crate::{
    dsp::{
        filter::{BiquadCoefficients, BiquadLowPass},
        lfo::{Lfo, LfoShape},
    },
    graph::node::{GraphNode, Modulatable, RenderCtx},
    param::{Param, CUTOFF, LFO_RATE, MOD_DEPTH, RESONANCE},
};

/*
Swept Low-pass Filter
=====================

In subtractive synthesis you start with a harmonically rich waveform and
remove harmonics to sculpt the timbre. This module is a resonant two-pole
low-pass whose cutoff is continuously swept by its own LFO and, optionally,
by an envelope routed into it.

Cutoff modulation works in octaves:

    lfo        bipolar LFO value in [−1, 1]
    depth      depth_fine + depth_coarse                  (0 to 2 octaves)
    env        envelope value · route weight · ENV_OCTAVES
    effective  cutoff · 2^(depth · lfo + env)

The effective cutoff is clamped to the cutoff parameter range and kept below
0.49 · sample_rate. With the defaults (1 kHz, depth 1) a sine LFO sweeps the
cutoff between 500 Hz and 2 kHz.

The LFO rate is also split fine + coarse and summed, giving 0 to 40 Hz.

Resonance
---------

    0.0   gentle roll-off (Q floored internally, never divides by zero)
    0.7   Butterworth-flat
    1.0   audible peak at the cutoff
*/

/// Octaves of cutoff shift for a full-scale envelope.
pub const ENV_OCTAVES: f32 = 4.0;

/// LFO pulse duty cycle for the filter sweep.
const PULSE_WIDTH: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterParam {
    /// Envelope input, in units of full scale. Scaled by `ENV_OCTAVES`.
    Cutoff,
}

pub struct FilterNode {
    filter: BiquadLowPass,
    lfo: Lfo,
    lfo_shape: LfoShape,
    cutoff: Param,
    resonance: Param,
    rate_fine: Param,
    rate_coarse: Param,
    depth_fine: Param,
    depth_coarse: Param,
    env_modulation: f32,
    effective_cutoff: f32,
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterNode {
    pub fn new() -> Self {
        Self {
            filter: BiquadLowPass::new(),
            lfo: Lfo::new(),
            lfo_shape: LfoShape::Sine,
            cutoff: Param::new(CUTOFF),
            resonance: Param::new(RESONANCE),
            rate_fine: Param::new(LFO_RATE),
            rate_coarse: Param::new(LFO_RATE),
            depth_fine: Param::new(MOD_DEPTH),
            depth_coarse: Param::new(MOD_DEPTH),
            env_modulation: 0.0,
            effective_cutoff: CUTOFF.default,
        }
    }

    /// Unmodulated low-pass: LFO depth zeroed.
    pub fn lowpass(cutoff_hz: f32) -> Self {
        let mut node = Self::new();
        node.set_cutoff(cutoff_hz);
        node.set_depth_fine(0.0);
        node.set_depth_coarse(0.0);
        node
    }

    pub fn set_cutoff(&mut self, hz: f32) -> f32 {
        self.cutoff.set(hz)
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff.get()
    }

    pub fn set_resonance(&mut self, resonance: f32) -> f32 {
        self.resonance.set(resonance)
    }

    pub fn resonance(&self) -> f32 {
        self.resonance.get()
    }

    pub fn set_lfo_shape(&mut self, shape: LfoShape) {
        self.lfo_shape = shape;
    }

    pub fn lfo_shape(&self) -> LfoShape {
        self.lfo_shape
    }

    pub fn set_rate_fine(&mut self, hz: f32) -> f32 {
        self.rate_fine.set(hz)
    }

    pub fn set_rate_coarse(&mut self, hz: f32) -> f32 {
        self.rate_coarse.set(hz)
    }

    pub fn set_depth_fine(&mut self, octaves: f32) -> f32 {
        self.depth_fine.set(octaves)
    }

    pub fn set_depth_coarse(&mut self, octaves: f32) -> f32 {
        self.depth_coarse.set(octaves)
    }

    /// Cutoff used for the most recent sample.
    pub fn effective_cutoff(&self) -> f32 {
        self.effective_cutoff
    }

    fn modulated_cutoff(&self, lfo: f32, sample_rate: f32) -> f32 {
        let depth = self.depth_fine.get() + self.depth_coarse.get();
        let octaves = depth * lfo + self.env_modulation;
        CUTOFF
            .clamp(self.cutoff.get() * 2.0_f32.powf(octaves))
            .min(sample_rate * 0.49)
    }
}

impl GraphNode for FilterNode {
    #[inline]
    fn next_sample(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        let rate = self.rate_fine.get() + self.rate_coarse.get();
        let lfo = self.lfo.next(self.lfo_shape, rate, ctx.sample_rate, PULSE_WIDTH);

        self.effective_cutoff = self.modulated_cutoff(lfo, ctx.sample_rate);
        let coeffs = BiquadCoefficients::lowpass(
            self.effective_cutoff,
            self.resonance.get(),
            ctx.sample_rate,
        );
        self.filter.next_sample(input, &coeffs)
    }

    fn reset(&mut self) {
        self.filter.reset();
        self.lfo.reset();
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.env_modulation,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, modulation: f32) {
        match param {
            FilterParam::Cutoff => self.env_modulation = modulation * ENV_OCTAVES,
        }
    }

    fn reset_modulation(&mut self, param: Self::Param) {
        match param {
            FilterParam::Cutoff => self.env_modulation = 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn default_sweep_spans_one_octave_each_way() {
        let mut node = FilterNode::new();
        node.set_lfo_shape(LfoShape::Triangle);
        let ctx = RenderCtx::new(SAMPLE_RATE);

        let (mut lo, mut hi) = (f32::MAX, f32::MIN);
        // Default rate is 2 Hz: one second covers two full cycles
        for _ in 0..48_000 {
            node.next_sample(0.0, &ctx);
            lo = lo.min(node.effective_cutoff());
            hi = hi.max(node.effective_cutoff());
        }

        assert!((lo - 500.0).abs() < 1.0, "lowest cutoff {lo}");
        assert!((hi - 2_000.0).abs() < 2.0, "highest cutoff {hi}");
    }

    #[test]
    fn effective_cutoff_respects_range_and_nyquist() {
        let mut node = FilterNode::new();
        node.set_cutoff(20_000.0);
        node.set_depth_coarse(1.0);
        node.set_depth_fine(1.0);

        let ctx = RenderCtx::new(8_000.0);
        for _ in 0..8_000 {
            let y = node.next_sample(1.0, &ctx);
            assert!(y.is_finite());
            assert!(node.effective_cutoff() <= 8_000.0 * 0.49);
            assert!(node.effective_cutoff() >= 20.0);
        }
    }

    #[test]
    fn envelope_modulation_shifts_by_octaves() {
        let mut node = FilterNode::lowpass(500.0);
        let ctx = RenderCtx::new(SAMPLE_RATE);

        node.apply_modulation(FilterParam::Cutoff, 0.5);
        node.next_sample(0.0, &ctx);
        assert!((node.effective_cutoff() - 2_000.0).abs() < 0.5);

        node.reset_modulation(FilterParam::Cutoff);
        node.next_sample(0.0, &ctx);
        assert!((node.effective_cutoff() - 500.0).abs() < 0.1);
    }

    #[test]
    fn static_lowpass_attenuates_above_cutoff() {
        let mut node = FilterNode::lowpass(300.0);
        node.set_resonance(0.707);
        let ctx = RenderCtx::new(SAMPLE_RATE);
        let mut buffer: Vec<f32> = (0..2_048).map(|n| if n % 2 == 0 { 1.0 } else { -1.0 }).collect();

        node.render_block(&mut buffer, &ctx);

        let tail = buffer[512..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!(tail < 1e-3, "nyquist tone leaked: {tail}");
    }

    #[test]
    fn setters_clamp() {
        let mut node = FilterNode::new();
        assert_eq!(node.set_cutoff(5.0), 20.0);
        assert_eq!(node.set_cutoff(50_000.0), 20_000.0);
        assert_eq!(node.set_resonance(3.0), 1.0);
        assert_eq!(node.set_depth_fine(-1.0), 0.0);
        assert_eq!(node.set_rate_coarse(100.0), 20.0);
    }
}
