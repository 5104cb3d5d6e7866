//! Bounded control values shared by every module.

/*
Parameters
==========

Every knob on the synth is a plain `f32` with a declared range. Writes are
never rejected: a value outside the range is clamped to the nearest bound,
and a NaN falls back to the range default so a bad control message can never
poison the audio path.

    ParamRange { min: 20.0, max: 20_000.0, default: 1_000.0 }

    set(-5.0)      → 20.0
    set(880.0)     → 880.0
    set(1e9)       → 20_000.0
    set(f32::NAN)  → 1_000.0

The ranges below are shared by all instances of a parameter kind. Modules
hold a `Param` (range + current value) per knob; presets store bare `f32`s and
run them back through the same ranges when loaded.
*/

/// Inclusive range and default for one kind of parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }

    /// Clamp `value` into the range. NaN resolves to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// LFO
pub const LFO_RATE: ParamRange = ParamRange::new(0.0, 20.0, 1.0);
pub const LFO_DEPTH: ParamRange = ParamRange::new(0.0, 1.0, 0.5);

// Filter
pub const CUTOFF: ParamRange = ParamRange::new(20.0, 20_000.0, 1_000.0);
pub const RESONANCE: ParamRange = ParamRange::new(0.0, 1.0, 0.0);
pub const MOD_DEPTH: ParamRange = ParamRange::new(0.0, 1.0, 0.5);

// Delay
pub const DELAY_TIME: ParamRange = ParamRange::new(0.0, 2.0, 0.5);
pub const DELAY_FEEDBACK: ParamRange = ParamRange::new(0.0, 0.95, 0.5);
pub const DELAY_MIX: ParamRange = ParamRange::new(0.0, 1.0, 0.5);

// Envelope
pub const ATTACK: ParamRange = ParamRange::new(0.001, 10.0, 0.1);
pub const DECAY: ParamRange = ParamRange::new(0.001, 10.0, 0.1);
pub const SUSTAIN: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
pub const RELEASE: ParamRange = ParamRange::new(0.001, 10.0, 0.5);
pub const ENVELOPE_MIX: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
pub const LFO_WIDTH: ParamRange = ParamRange::new(0.0, 1.0, 0.5);

// Oscillator
pub const FREQUENCY: ParamRange = ParamRange::new(20.0, 20_000.0, 440.0);
pub const AMPLITUDE: ParamRange = ParamRange::new(0.0, 1.0, 0.5);

// Mixer and routing
pub const MASTER_VOLUME: ParamRange = ParamRange::new(0.0, 1.0, 0.5);
pub const ROUTE_WEIGHT: ParamRange = ParamRange::new(0.0, 1.0, 1.0);

/// A clamped control value bound to its range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    value: f32,
    range: ParamRange,
}

impl Param {
    pub const fn new(range: ParamRange) -> Self {
        Self {
            value: range.default,
            range,
        }
    }

    /// Write a new value, clamped. Returns the value actually stored.
    #[inline]
    pub fn set(&mut self, value: f32) -> f32 {
        self.value = self.range.clamp(value);
        self.value
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    pub fn range(&self) -> ParamRange {
        self.range
    }

    pub fn reset(&mut self) {
        self.value = self.range.default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_RANGES: &[ParamRange] = &[
        LFO_RATE,
        LFO_DEPTH,
        CUTOFF,
        RESONANCE,
        MOD_DEPTH,
        DELAY_TIME,
        DELAY_FEEDBACK,
        DELAY_MIX,
        ATTACK,
        DECAY,
        SUSTAIN,
        RELEASE,
        ENVELOPE_MIX,
        LFO_WIDTH,
        FREQUENCY,
        AMPLITUDE,
        MASTER_VOLUME,
        ROUTE_WEIGHT,
    ];

    #[test]
    fn defaults_sit_inside_their_ranges() {
        for range in ALL_RANGES {
            assert!(range.min <= range.default && range.default <= range.max, "{range:?}");
        }
    }

    #[test]
    fn writes_are_clamped() {
        let mut cutoff = Param::new(CUTOFF);
        assert_eq!(cutoff.get(), 1_000.0);

        assert_eq!(cutoff.set(-5.0), 20.0);
        assert_eq!(cutoff.set(880.0), 880.0);
        assert_eq!(cutoff.set(1e9), 20_000.0);
    }

    #[test]
    fn nan_falls_back_to_default() {
        let mut feedback = Param::new(DELAY_FEEDBACK);
        feedback.set(0.9);
        assert_eq!(feedback.set(f32::NAN), 0.5);
    }

    #[test]
    fn feedback_never_exceeds_stability_bound() {
        let mut feedback = Param::new(DELAY_FEEDBACK);
        assert!(feedback.set(4.0) <= 0.95);
        assert_eq!(feedback.set(f32::INFINITY), 0.95);
    }
}
