use std::f32::consts::TAU;

use crate::graph::node::RenderCtx;

/*
Two-pole resonant low-pass (RBJ biquad)
=======================================

| symbol | meaning                                    |
| ------ | ------------------------------------------ |
| ω      | 2π · cutoff / sample_rate                  |
| α      | sin ω / (2 · Q), Q = max(resonance, floor) |
| b0, b2 | (1 − cos ω) / 2                            |
| b1     | 1 − cos ω                                  |
| a0     | 1 + α                                      |
| a1     | −2 cos ω                                   |
| a2     | 1 − α                                      |

    y[n] = (b0·x[n] + b1·x[n−1] + b2·x[n−2] − a1·y[n−1] − a2·y[n−2]) / a0

Coefficients are recomputed on every sample because the cutoff is swept by
an LFO. A resonance of exactly zero would divide by zero in α, so Q is floored
at `RESONANCE_FLOOR`. The cutoff is kept below 0.49 · sample_rate so ω never
reaches π.
*/

/// Smallest Q used in the coefficient math.
pub const RESONANCE_FLOOR: f32 = 0.1;

/// Highest cutoff as a fraction of the sample rate.
const MAX_CUTOFF_RATIO: f32 = 0.49;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a0: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    pub fn lowpass(cutoff_hz: f32, resonance: f32, sample_rate: f32) -> Self {
        let cutoff_hz = cutoff_hz.min(sample_rate * MAX_CUTOFF_RATIO);
        let omega = TAU * cutoff_hz / sample_rate;
        let (sin_w, cos_w) = omega.sin_cos();
        let alpha = sin_w / (2.0 * resonance.max(RESONANCE_FLOOR));

        Self {
            b0: (1.0 - cos_w) / 2.0,
            b1: 1.0 - cos_w,
            b2: (1.0 - cos_w) / 2.0,
            a0: 1.0 + alpha,
            a1: -2.0 * cos_w,
            a2: 1.0 - alpha,
        }
    }
}

/// Low-pass biquad with a two-sample input and output history.
#[derive(Debug, Clone, Default)]
pub struct BiquadLowPass {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadLowPass {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32, coeffs: &BiquadCoefficients) -> f32 {
        let BiquadCoefficients { b0, b1, b2, a0, a1, a2 } = *coeffs;
        let output = (b0 * input + b1 * self.x1 + b2 * self.x2 - a1 * self.y1 - a2 * self.y2) / a0;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Filter a block in place at a fixed cutoff.
    pub fn render(&mut self, buffer: &mut [f32], cutoff_hz: f32, resonance: f32, ctx: &RenderCtx) {
        let coeffs = BiquadCoefficients::lowpass(cutoff_hz, resonance, ctx.sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, &coeffs);
        }
    }

    /// Most recent outputs, newest first.
    pub fn last_outputs(&self) -> [f32; 2] {
        [self.y1, self.y2]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = BiquadLowPass::new();
        let mut buffer = vec![1.0; 4_096];
        let ctx = RenderCtx::new(48_000.0);

        filter.render(&mut buffer, 500.0, 0.707, &ctx);

        assert!((buffer[4_095] - 1.0).abs() < 1e-3, "got {}", buffer[4_095]);
    }

    #[test]
    fn test_lowpass_filters_high_freq() {
        let sample_rate = 48_000.0;
        let ctx = RenderCtx::new(sample_rate);

        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 1_024];
        osc.render(&mut buffer, 8_000.0, sample_rate);

        let mut filter = BiquadLowPass::new();
        filter.render(&mut buffer, 500.0, 0.707, &ctx);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.05, "Expected high freq attenuation, got peak: {}", peak);
    }

    #[test]
    fn impulse_response_decays_monotonically_at_minimum_resonance() {
        let coeffs = BiquadCoefficients::lowpass(1_000.0, 0.0, 48_000.0);
        let mut filter = BiquadLowPass::new();

        let response: Vec<f32> = (0..4_000)
            .map(|n| filter.next_sample(if n == 0 { 1.0 } else { 0.0 }, &coeffs))
            .collect();

        let peak_index = response
            .iter()
            .enumerate()
            .fold(0, |best, (i, &v)| if v > response[best] { i } else { best });

        for pair in response[peak_index..].windows(2) {
            assert!(pair[1] <= pair[0] + 1e-9, "response rose after peak: {pair:?}");
            assert!(pair[1] >= 0.0);
        }
        assert!(response[3_999].abs() < 1e-6);
    }

    #[test]
    fn zero_resonance_never_divides_by_zero() {
        for cutoff in [20.0, 1_000.0, 20_000.0, 100_000.0] {
            let coeffs = BiquadCoefficients::lowpass(cutoff, 0.0, 44_100.0);
            assert!(coeffs.a0.is_finite() && coeffs.a0 > 0.0);

            let mut filter = BiquadLowPass::new();
            for n in 0..1_000 {
                let y = filter.next_sample(if n % 2 == 0 { 1.0 } else { -1.0 }, &coeffs);
                assert!(y.is_finite(), "non-finite output at cutoff {cutoff}");
            }
        }
    }

    #[test]
    fn higher_resonance_boosts_cutoff_region() {
        let sample_rate = 48_000.0;
        let cutoff = 1_000.0;
        let ctx = RenderCtx::new(sample_rate);

        let run = |resonance: f32| {
            let mut osc = OscillatorBlock::sine();
            let mut buffer = vec![0.0f32; 2_048];
            osc.render(&mut buffer, cutoff, sample_rate);
            let mut filter = BiquadLowPass::new();
            filter.render(&mut buffer, cutoff, resonance, &ctx);
            peak_after_transient(&buffer)
        };

        let damped = run(0.1);
        let resonant = run(1.0);
        assert!(
            resonant > damped * 1.5,
            "resonance should boost cutoff: resonant={resonant}, damped={damped}"
        );
    }
}
