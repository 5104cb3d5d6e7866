#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{
        envelope::{Envelope, EnvelopeStage},
        lfo::{bipolar_to_unipolar, Lfo, LfoShape},
    },
    graph::node::RenderCtx,
    param::{Param, ENVELOPE_MIX, LFO_DEPTH, LFO_RATE, LFO_WIDTH},
};

/// Shape of the envelope's secondary LFO. `Off` contributes 0 to the blend.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeLfo {
    #[default]
    Off,
    Sine,
    Triangle,
    Pulse,
}

impl EnvelopeLfo {
    fn shape(self) -> Option<LfoShape> {
        match self {
            EnvelopeLfo::Off => None,
            EnvelopeLfo::Sine => Some(LfoShape::Sine),
            EnvelopeLfo::Triangle => Some(LfoShape::Triangle),
            EnvelopeLfo::Pulse => Some(LfoShape::Pulse),
        }
    }
}

/// Modulation source: an ADSR blended with a free-running unipolar LFO.
///
/// ```text
/// lfo    = raw · depth · 0.5 + 0.5        (0 when off)
/// output = adsr · (1 − mix) + lfo · mix
/// ```
///
/// The LFO does not follow the gate; it keeps running between notes. When
/// its shape is `Off` its phase holds.
pub struct EnvNode {
    env: Envelope,
    lfo: Lfo,
    lfo_shape: EnvelopeLfo,
    lfo_rate_fine: Param,
    lfo_rate_coarse: Param,
    lfo_depth: Param,
    lfo_width: Param,
    mix: Param,
    value: f32,
}

impl Default for EnvNode {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvNode {
    pub fn new() -> Self {
        Self::with_envelope(Envelope::new())
    }

    pub fn with_envelope(env: Envelope) -> Self {
        Self {
            env,
            lfo: Lfo::new(),
            lfo_shape: EnvelopeLfo::Off,
            lfo_rate_fine: Param::new(LFO_RATE),
            lfo_rate_coarse: Param::new(LFO_RATE),
            lfo_depth: Param::new(LFO_DEPTH),
            lfo_width: Param::new(LFO_WIDTH),
            mix: Param::new(ENVELOPE_MIX),
            value: 0.0,
        }
    }

    pub fn note_on(&mut self) {
        self.env.note_on();
    }

    pub fn note_off(&mut self) {
        self.env.note_off();
    }

    /// Advance one sample and return the blended output.
    #[inline]
    pub fn next_value(&mut self, ctx: &RenderCtx) -> f32 {
        let adsr = self.env.next_sample(ctx);

        let lfo = match self.lfo_shape.shape() {
            Some(shape) => {
                let rate = self.lfo_rate_fine.get() + self.lfo_rate_coarse.get();
                let raw = self.lfo.next(shape, rate, ctx.sample_rate, self.lfo_width.get());
                bipolar_to_unipolar(raw * self.lfo_depth.get())
            }
            None => 0.0,
        };

        let mix = self.mix.get();
        self.value = adsr * (1.0 - mix) + lfo * mix;
        self.value
    }

    /// Last value produced by `next_value`.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// True while the ADSR is anywhere but idle.
    pub fn is_generating(&self) -> bool {
        self.env.is_active()
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.env.stage()
    }

    pub fn level(&self) -> f32 {
        self.env.level()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    pub fn envelope_mut(&mut self) -> &mut Envelope {
        &mut self.env
    }

    pub fn set_lfo_shape(&mut self, shape: EnvelopeLfo) {
        self.lfo_shape = shape;
    }

    pub fn lfo_shape(&self) -> EnvelopeLfo {
        self.lfo_shape
    }

    pub fn set_lfo_rate_fine(&mut self, hz: f32) -> f32 {
        self.lfo_rate_fine.set(hz)
    }

    pub fn set_lfo_rate_coarse(&mut self, hz: f32) -> f32 {
        self.lfo_rate_coarse.set(hz)
    }

    pub fn set_lfo_depth(&mut self, depth: f32) -> f32 {
        self.lfo_depth.set(depth)
    }

    pub fn set_lfo_width(&mut self, width: f32) -> f32 {
        self.lfo_width.set(width)
    }

    pub fn set_mix(&mut self, mix: f32) -> f32 {
        self.mix.set(mix)
    }

    pub fn mix(&self) -> f32 {
        self.mix.get()
    }

    pub fn reset(&mut self) {
        self.env.reset();
        self.lfo.reset();
        self.value = 0.0;
    }
}
