#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::param::{ParamRange, DELAY_TIME};

/// Sample rates the engine accepts. Anything else is clamped, NaN falls back to 44.1 kHz.
pub const SAMPLE_RATE: ParamRange = ParamRange::new(8_000.0, 384_000.0, 44_100.0);

/// Longest delay buffer, in seconds, the engine will allocate.
pub const MAX_DELAY_TIME: ParamRange = ParamRange::new(DELAY_TIME.max, 60.0, DELAY_TIME.max);

/// How often envelope values are pushed into their modulation targets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModulationRate {
    /// Every sample. Smoothest, and the reference behavior.
    #[default]
    PerSample,
    /// Once, at the first sample of each rendered block.
    PerBlock,
}

/// Construction-time settings for [`SynthEngine`](super::SynthEngine).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Control messages that can wait between two rendered blocks.
    pub queue_capacity: usize,
    pub modulation_rate: ModulationRate,
    /// Delay buffer length in seconds. Never shorter than the delay time range.
    pub max_delay_time: f32,
    pub noise_seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE.default,
            queue_capacity: 256,
            modulation_rate: ModulationRate::PerSample,
            max_delay_time: MAX_DELAY_TIME.default,
            noise_seed: 0x5EED,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_modulation_rate(mut self, rate: ModulationRate) -> Self {
        self.modulation_rate = rate;
        self
    }

    pub fn with_max_delay_time(mut self, seconds: f32) -> Self {
        self.max_delay_time = seconds;
        self
    }

    pub fn with_noise_seed(mut self, seed: u32) -> Self {
        self.noise_seed = seed;
        self
    }

    /// Pull every field into something the engine can run with.
    pub fn sanitized(self) -> Self {
        let sanitized = Self {
            sample_rate: SAMPLE_RATE.clamp(self.sample_rate),
            queue_capacity: self.queue_capacity.max(1),
            max_delay_time: MAX_DELAY_TIME.clamp(self.max_delay_time),
            ..self
        };
        if sanitized != self {
            log::warn!(target: "kluster::config", "adjusted engine config {self:?} to {sanitized:?}");
        }
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_untouched() {
        let config = EngineConfig::default();
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn unusable_values_are_pulled_into_range() {
        let config = EngineConfig::default()
            .with_sample_rate(0.0)
            .with_queue_capacity(0)
            .with_max_delay_time(f32::INFINITY)
            .sanitized();
        assert_eq!(config.sample_rate, 8_000.0);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.max_delay_time, 60.0);

        let config = EngineConfig::default()
            .with_sample_rate(f32::NAN)
            .with_max_delay_time(0.1)
            .sanitized();
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.max_delay_time, 2.0);
    }
}
