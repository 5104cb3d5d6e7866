//! Flat, copyable snapshot of every module setting plus the routing table.
//!
//! A [`Preset`] is what the control handle mirrors, what `load_preset` ships
//! to the render thread in one message, and what gets written to disk.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{lfo::LfoShape, oscillator::Waveform},
    graph::envelope::EnvelopeLfo,
    param,
    routing::{Route, RoutingTable},
    synth::message::{
        DelaySetting, EnvelopeSetting, FilterSetting, OscillatorSetting, ParamTarget, Slot,
    },
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorSettings {
    pub waveform: Waveform,
    pub frequency: f32,
    pub amplitude: f32,
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            frequency: param::FREQUENCY.default,
            amplitude: param::AMPLITUDE.default,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeSettings {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
    pub lfo: EnvelopeLfo,
    pub lfo_rate_fine: f32,
    pub lfo_rate_coarse: f32,
    pub lfo_depth: f32,
    pub lfo_width: f32,
    pub mix: f32,
}

impl Default for EnvelopeSettings {
    fn default() -> Self {
        Self {
            attack: param::ATTACK.default,
            decay: param::DECAY.default,
            sustain: param::SUSTAIN.default,
            release: param::RELEASE.default,
            lfo: EnvelopeLfo::Off,
            lfo_rate_fine: param::LFO_RATE.default,
            lfo_rate_coarse: param::LFO_RATE.default,
            lfo_depth: param::LFO_DEPTH.default,
            lfo_width: param::LFO_WIDTH.default,
            mix: param::ENVELOPE_MIX.default,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSettings {
    pub cutoff: f32,
    pub resonance: f32,
    pub lfo: LfoShape,
    pub rate_fine: f32,
    pub rate_coarse: f32,
    pub depth_fine: f32,
    pub depth_coarse: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            cutoff: param::CUTOFF.default,
            resonance: param::RESONANCE.default,
            lfo: LfoShape::Sine,
            rate_fine: param::LFO_RATE.default,
            rate_coarse: param::LFO_RATE.default,
            depth_fine: param::MOD_DEPTH.default,
            depth_coarse: param::MOD_DEPTH.default,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySettings {
    pub time: f32,
    pub feedback: f32,
    pub mix: f32,
    pub lfo: LfoShape,
    pub lfo_amount: f32,
    pub rate_fine: f32,
    pub rate_coarse: f32,
}

impl Default for DelaySettings {
    fn default() -> Self {
        Self {
            time: param::DELAY_TIME.default,
            feedback: param::DELAY_FEEDBACK.default,
            mix: param::DELAY_MIX.default,
            lfo: LfoShape::Sine,
            lfo_amount: param::LFO_DEPTH.default,
            rate_fine: param::LFO_RATE.default,
            rate_coarse: param::LFO_RATE.default,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub oscillators: [OscillatorSettings; 2],
    pub envelopes: [EnvelopeSettings; 2],
    pub filters: [FilterSettings; 2],
    pub delays: [DelaySettings; 2],
    pub routing: RoutingTable,
    pub master_volume: f32,
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            oscillators: [OscillatorSettings::default(); 2],
            envelopes: [EnvelopeSettings::default(); 2],
            filters: [FilterSettings::default(); 2],
            delays: [DelaySettings::default(); 2],
            routing: RoutingTable::default(),
            master_volume: param::MASTER_VOLUME.default,
        }
    }
}

impl Preset {
    /// Stored value for `target`.
    pub fn param(&self, target: ParamTarget) -> f32 {
        match target {
            ParamTarget::Oscillator(slot, setting) => {
                let osc = &self.oscillators[slot.index()];
                match setting {
                    OscillatorSetting::Frequency => osc.frequency,
                    OscillatorSetting::Amplitude => osc.amplitude,
                }
            }
            ParamTarget::Envelope(slot, setting) => {
                let env = &self.envelopes[slot.index()];
                match setting {
                    EnvelopeSetting::Attack => env.attack,
                    EnvelopeSetting::Decay => env.decay,
                    EnvelopeSetting::Sustain => env.sustain,
                    EnvelopeSetting::Release => env.release,
                    EnvelopeSetting::LfoRateFine => env.lfo_rate_fine,
                    EnvelopeSetting::LfoRateCoarse => env.lfo_rate_coarse,
                    EnvelopeSetting::LfoDepth => env.lfo_depth,
                    EnvelopeSetting::LfoWidth => env.lfo_width,
                    EnvelopeSetting::Mix => env.mix,
                }
            }
            ParamTarget::Filter(slot, setting) => {
                let filter = &self.filters[slot.index()];
                match setting {
                    FilterSetting::Cutoff => filter.cutoff,
                    FilterSetting::Resonance => filter.resonance,
                    FilterSetting::RateFine => filter.rate_fine,
                    FilterSetting::RateCoarse => filter.rate_coarse,
                    FilterSetting::DepthFine => filter.depth_fine,
                    FilterSetting::DepthCoarse => filter.depth_coarse,
                }
            }
            ParamTarget::Delay(slot, setting) => {
                let delay = &self.delays[slot.index()];
                match setting {
                    DelaySetting::Time => delay.time,
                    DelaySetting::Feedback => delay.feedback,
                    DelaySetting::Mix => delay.mix,
                    DelaySetting::LfoAmount => delay.lfo_amount,
                    DelaySetting::RateFine => delay.rate_fine,
                    DelaySetting::RateCoarse => delay.rate_coarse,
                }
            }
            ParamTarget::MasterVolume => self.master_volume,
        }
    }

    /// Store `value` clamped into the target's range and return what was stored.
    pub fn set_param(&mut self, target: ParamTarget, value: f32) -> f32 {
        let value = target.range().clamp(value);
        *self.slot_mut(target) = value;
        value
    }

    fn slot_mut(&mut self, target: ParamTarget) -> &mut f32 {
        match target {
            ParamTarget::Oscillator(slot, setting) => {
                let osc = &mut self.oscillators[slot.index()];
                match setting {
                    OscillatorSetting::Frequency => &mut osc.frequency,
                    OscillatorSetting::Amplitude => &mut osc.amplitude,
                }
            }
            ParamTarget::Envelope(slot, setting) => {
                let env = &mut self.envelopes[slot.index()];
                match setting {
                    EnvelopeSetting::Attack => &mut env.attack,
                    EnvelopeSetting::Decay => &mut env.decay,
                    EnvelopeSetting::Sustain => &mut env.sustain,
                    EnvelopeSetting::Release => &mut env.release,
                    EnvelopeSetting::LfoRateFine => &mut env.lfo_rate_fine,
                    EnvelopeSetting::LfoRateCoarse => &mut env.lfo_rate_coarse,
                    EnvelopeSetting::LfoDepth => &mut env.lfo_depth,
                    EnvelopeSetting::LfoWidth => &mut env.lfo_width,
                    EnvelopeSetting::Mix => &mut env.mix,
                }
            }
            ParamTarget::Filter(slot, setting) => {
                let filter = &mut self.filters[slot.index()];
                match setting {
                    FilterSetting::Cutoff => &mut filter.cutoff,
                    FilterSetting::Resonance => &mut filter.resonance,
                    FilterSetting::RateFine => &mut filter.rate_fine,
                    FilterSetting::RateCoarse => &mut filter.rate_coarse,
                    FilterSetting::DepthFine => &mut filter.depth_fine,
                    FilterSetting::DepthCoarse => &mut filter.depth_coarse,
                }
            }
            ParamTarget::Delay(slot, setting) => {
                let delay = &mut self.delays[slot.index()];
                match setting {
                    DelaySetting::Time => &mut delay.time,
                    DelaySetting::Feedback => &mut delay.feedback,
                    DelaySetting::Mix => &mut delay.mix,
                    DelaySetting::LfoAmount => &mut delay.lfo_amount,
                    DelaySetting::RateFine => &mut delay.rate_fine,
                    DelaySetting::RateCoarse => &mut delay.rate_coarse,
                }
            }
            ParamTarget::MasterVolume => &mut self.master_volume,
        }
    }

    /// Copy with every value clamped into its range and NaNs replaced by defaults.
    pub fn sanitized(mut self) -> Self {
        for target in ParamTarget::all() {
            self.set_param(target, self.param(target));
        }
        for route in Route::ALL {
            self.routing.set_weight(route, self.routing.weight(route));
        }
        self
    }

    /// True when no value lies outside its range.
    pub fn is_sanitized(&self) -> bool {
        ParamTarget::all().all(|t| t.range().contains(self.param(t)))
            && self
                .routing
                .iter()
                .all(|(_, state)| param::ROUTE_WEIGHT.contains(state.weight))
    }

    pub fn oscillator(&self, slot: Slot) -> &OscillatorSettings {
        &self.oscillators[slot.index()]
    }

    pub fn envelope(&self, slot: Slot) -> &EnvelopeSettings {
        &self.envelopes[slot.index()]
    }

    pub fn filter(&self, slot: Slot) -> &FilterSettings {
        &self.filters[slot.index()]
    }

    pub fn delay(&self, slot: Slot) -> &DelaySettings {
        &self.delays[slot.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_param_clamps_and_reads_back() {
        let mut preset = Preset::default();
        let target = ParamTarget::Delay(Slot::Two, DelaySetting::Feedback);

        assert_eq!(preset.set_param(target, 2.0), 0.95);
        assert_eq!(preset.param(target), 0.95);
        assert_eq!(preset.delays[1].feedback, 0.95);
        assert_eq!(preset.delays[0].feedback, 0.5);
    }

    #[test]
    fn sanitized_pulls_everything_into_range() {
        let mut preset = Preset::default();
        preset.filters[0].cutoff = 1.0e6;
        preset.envelopes[1].attack = 0.0;
        preset.oscillators[0].amplitude = f32::NAN;
        preset.master_volume = -3.0;
        preset.routing.set_state(
            Route::Env1ToOsc2,
            crate::routing::RouteState {
                enabled: true,
                weight: 7.0,
            },
        );
        assert!(!preset.is_sanitized());

        let clean = preset.sanitized();

        assert!(clean.is_sanitized());
        assert_eq!(clean.filters[0].cutoff, 20_000.0);
        assert_eq!(clean.envelopes[1].attack, 0.001);
        assert_eq!(clean.oscillators[0].amplitude, 0.5);
        assert_eq!(clean.master_volume, 0.0);
        assert_eq!(clean.routing.weight(Route::Env1ToOsc2), 1.0);
        assert!(clean.routing.is_enabled(Route::Env1ToOsc2));
    }

    #[test]
    fn default_preset_is_in_range() {
        assert!(Preset::default().is_sanitized());
        assert_eq!(Preset::default().sanitized(), Preset::default());
    }
}
