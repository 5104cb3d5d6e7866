//! Low Frequency Oscillator (LFO) primitives shared by the modulated modules.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/*
Low Frequency Oscillators
=========================

Three modules carry their own LFO: the envelope (blended into its output),
the filter (sweeping cutoff) and the delay (wobbling the read time). They all
share the same phase accumulator and shape table defined here.

Vocabulary
----------

  phase       Position inside one cycle, normalized to [0, 1).

  rate        Cycles per second. The filter and delay expose it as a
              fine + coarse pair that is summed before use, so the
              effective rate spans 0-40 Hz.

  bipolar     Shape output in -1.0..=+1.0. Filter and delay consume this
              directly (cutoff sweeps both up and down).

  unipolar    0.0..=1.0. The envelope maps its LFO into this range so it
              can be blended with the ADSR level.


Shapes
------

Evaluated at phase p:

    SINE       sin(2π·p)
    TRIANGLE   2·|2p − 1| − 1      (starts at +1, dips to −1 at p = 0.5)
    SAW        2p − 1              (rising ramp)
    PULSE      p < width ? +1 : −1


Advance, then evaluate
----------------------

Each call to `Lfo::next` first advances the phase by rate / sample_rate and
then evaluates the shape. The very first value is therefore taken at one
increment past zero, not at zero. This ordering is part of the audible
behavior of the modulated modules and is kept stable.
*/

/// LFO waveform used by the filter, delay and envelope modulators.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LfoShape {
    #[default]
    Sine,
    Triangle,
    Saw,
    Pulse,
}

impl LfoShape {
    /// Evaluate the bipolar shape at `phase` (0..1). `width` only affects `Pulse`.
    #[inline]
    pub fn evaluate(self, phase: f32, width: f32) -> f32 {
        match self {
            LfoShape::Sine => (TAU * phase).sin(),
            LfoShape::Triangle => 2.0 * (2.0 * phase - 1.0).abs() - 1.0,
            LfoShape::Saw => 2.0 * phase - 1.0,
            LfoShape::Pulse => {
                if phase < width {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

/// Free-running phase accumulator for a control-rate oscillator.
#[derive(Debug, Clone, Default)]
pub struct Lfo {
    phase: f64,
}

impl Lfo {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Advance by one sample at `rate_hz` and return the bipolar shape value.
    #[inline]
    pub fn next(&mut self, shape: LfoShape, rate_hz: f32, sample_rate: f32, width: f32) -> f32 {
        self.phase = (self.phase + rate_hz as f64 / sample_rate as f64).fract();
        shape.evaluate(self.phase as f32, width)
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_hit_their_landmarks() {
        assert!(LfoShape::Sine.evaluate(0.25, 0.5) > 0.9999);
        assert!((LfoShape::Triangle.evaluate(0.0, 0.5) - 1.0).abs() < 1e-6);
        assert!((LfoShape::Triangle.evaluate(0.5, 0.5) + 1.0).abs() < 1e-6);
        assert!((LfoShape::Saw.evaluate(0.0, 0.5) + 1.0).abs() < 1e-6);
        assert_eq!(LfoShape::Pulse.evaluate(0.2, 0.5), 1.0);
        assert_eq!(LfoShape::Pulse.evaluate(0.2, 0.1), -1.0);
    }

    #[test]
    fn output_stays_bipolar() {
        for shape in [LfoShape::Sine, LfoShape::Triangle, LfoShape::Saw, LfoShape::Pulse] {
            let mut lfo = Lfo::new();
            for _ in 0..4_800 {
                let value = lfo.next(shape, 7.0, 48_000.0, 0.5);
                assert!(
                    (-1.0..=1.0).contains(&value),
                    "{shape:?} produced {value} outside [-1.0, 1.0]"
                );
            }
        }
    }

    #[test]
    fn phase_wraps_below_one() {
        let mut lfo = Lfo::new();
        for _ in 0..1_000 {
            lfo.next(LfoShape::Saw, 40.0, 1_000.0, 0.5);
            assert!((0.0..1.0).contains(&lfo.phase()));
        }
    }

    #[test]
    fn zero_rate_holds_phase() {
        let mut lfo = Lfo::new();
        let first = lfo.next(LfoShape::Sine, 0.0, 48_000.0, 0.5);
        let second = lfo.next(LfoShape::Sine, 0.0, 48_000.0, 0.5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_bipolar_to_unipolar() {
        assert!((bipolar_to_unipolar(-1.0) - 0.0).abs() < 1e-6);
        assert!((bipolar_to_unipolar(0.0) - 0.5).abs() < 1e-6);
        assert!((bipolar_to_unipolar(1.0) - 1.0).abs() < 1e-6);
    }
}
