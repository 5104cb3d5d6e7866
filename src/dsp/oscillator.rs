#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;

/// Audio-rate oscillator waveforms.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    Pulse,
    Noise,
}

impl Waveform {
    pub const ALL: [Waveform; 5] = [
        Waveform::Sine,
        Waveform::Triangle,
        Waveform::Sawtooth,
        Waveform::Pulse,
        Waveform::Noise,
    ];

    /// Short panel label.
    pub fn label(self) -> &'static str {
        match self {
            Waveform::Sine => "SINE",
            Waveform::Triangle => "TRI",
            Waveform::Sawtooth => "SAW",
            Waveform::Pulse => "PLS",
            Waveform::Noise => "NOISE",
        }
    }
}

/// White noise from a 32-bit xorshift generator.
///
/// Deterministic for a given seed and allocation-free, so renders are
/// reproducible and safe on the audio thread. Not band-limited.
#[derive(Debug, Clone)]
pub struct NoiseSource {
    state: u32,
}

impl NoiseSource {
    pub fn new(seed: u32) -> Self {
        // xorshift has a fixed point at zero
        let state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { state }
    }

    /// Next uniform sample in -1.0..=1.0.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}

/// Phase accumulator plus waveform table. Unit amplitude.
pub struct OscillatorBlock {
    phase: f64,
    waveform: Waveform,
    noise: NoiseSource,
}

impl OscillatorBlock {
    pub fn new(waveform: Waveform, seed: u32) -> Self {
        Self {
            phase: 0.0,
            waveform,
            noise: NoiseSource::new(seed),
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine, 1)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Sawtooth, 1)
    }

    /// Evaluate the waveform at the current phase, then advance the phase.
    ///
    /// Sample `n` is therefore taken at `frac(n * frequency / sample_rate)`.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let p = self.phase as f32;
        let value = match self.waveform {
            Waveform::Sine => (TAU * p).sin(),
            Waveform::Triangle => 2.0 * (2.0 * p - 1.0).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Pulse => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Noise => self.noise.next_sample(),
        };

        self.phase = (self.phase + frequency as f64 / sample_rate as f64).rem_euclid(1.0);
        value
    }

    pub fn render(&mut self, destination: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in destination.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}
