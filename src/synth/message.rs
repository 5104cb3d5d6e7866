use rtrb::Consumer;

use crate::{
    dsp::{lfo::LfoShape, oscillator::Waveform},
    graph::envelope::EnvelopeLfo,
    param::{self, ParamRange},
    patch::Preset,
    routing::{Route, RouteState},
};

/// Which of the two identical module lanes a setting belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::One, Slot::Two];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OscillatorSetting {
    Frequency,
    Amplitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvelopeSetting {
    Attack,
    Decay,
    Sustain,
    Release,
    LfoRateFine,
    LfoRateCoarse,
    LfoDepth,
    LfoWidth,
    Mix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterSetting {
    Cutoff,
    Resonance,
    RateFine,
    RateCoarse,
    DepthFine,
    DepthCoarse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelaySetting {
    Time,
    Feedback,
    Mix,
    LfoAmount,
    RateFine,
    RateCoarse,
}

impl OscillatorSetting {
    pub const ALL: [Self; 2] = [Self::Frequency, Self::Amplitude];
}

impl EnvelopeSetting {
    pub const ALL: [Self; 9] = [
        Self::Attack,
        Self::Decay,
        Self::Sustain,
        Self::Release,
        Self::LfoRateFine,
        Self::LfoRateCoarse,
        Self::LfoDepth,
        Self::LfoWidth,
        Self::Mix,
    ];
}

impl FilterSetting {
    pub const ALL: [Self; 6] = [
        Self::Cutoff,
        Self::Resonance,
        Self::RateFine,
        Self::RateCoarse,
        Self::DepthFine,
        Self::DepthCoarse,
    ];
}

impl DelaySetting {
    pub const ALL: [Self; 6] = [
        Self::Time,
        Self::Feedback,
        Self::Mix,
        Self::LfoAmount,
        Self::RateFine,
        Self::RateCoarse,
    ];
}

/// Every continuous parameter the control surface can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamTarget {
    Oscillator(Slot, OscillatorSetting),
    Envelope(Slot, EnvelopeSetting),
    Filter(Slot, FilterSetting),
    Delay(Slot, DelaySetting),
    MasterVolume,
}

impl ParamTarget {
    pub fn range(self) -> ParamRange {
        match self {
            ParamTarget::Oscillator(_, setting) => match setting {
                OscillatorSetting::Frequency => param::FREQUENCY,
                OscillatorSetting::Amplitude => param::AMPLITUDE,
            },
            ParamTarget::Envelope(_, setting) => match setting {
                EnvelopeSetting::Attack => param::ATTACK,
                EnvelopeSetting::Decay => param::DECAY,
                EnvelopeSetting::Sustain => param::SUSTAIN,
                EnvelopeSetting::Release => param::RELEASE,
                EnvelopeSetting::LfoRateFine | EnvelopeSetting::LfoRateCoarse => param::LFO_RATE,
                EnvelopeSetting::LfoDepth => param::LFO_DEPTH,
                EnvelopeSetting::LfoWidth => param::LFO_WIDTH,
                EnvelopeSetting::Mix => param::ENVELOPE_MIX,
            },
            ParamTarget::Filter(_, setting) => match setting {
                FilterSetting::Cutoff => param::CUTOFF,
                FilterSetting::Resonance => param::RESONANCE,
                FilterSetting::RateFine | FilterSetting::RateCoarse => param::LFO_RATE,
                FilterSetting::DepthFine | FilterSetting::DepthCoarse => param::MOD_DEPTH,
            },
            ParamTarget::Delay(_, setting) => match setting {
                DelaySetting::Time => param::DELAY_TIME,
                DelaySetting::Feedback => param::DELAY_FEEDBACK,
                DelaySetting::Mix => param::DELAY_MIX,
                DelaySetting::LfoAmount => param::LFO_DEPTH,
                DelaySetting::RateFine | DelaySetting::RateCoarse => param::LFO_RATE,
            },
            ParamTarget::MasterVolume => param::MASTER_VOLUME,
        }
    }

    /// All targets, lane one before lane two within each module kind.
    pub fn all() -> impl Iterator<Item = ParamTarget> {
        let oscillators = Slot::ALL.into_iter().flat_map(|slot| {
            OscillatorSetting::ALL
                .into_iter()
                .map(move |s| ParamTarget::Oscillator(slot, s))
        });
        let envelopes = Slot::ALL.into_iter().flat_map(|slot| {
            EnvelopeSetting::ALL
                .into_iter()
                .map(move |s| ParamTarget::Envelope(slot, s))
        });
        let filters = Slot::ALL.into_iter().flat_map(|slot| {
            FilterSetting::ALL
                .into_iter()
                .map(move |s| ParamTarget::Filter(slot, s))
        });
        let delays = Slot::ALL.into_iter().flat_map(|slot| {
            DelaySetting::ALL
                .into_iter()
                .map(move |s| ParamTarget::Delay(slot, s))
        });

        oscillators
            .chain(envelopes)
            .chain(filters)
            .chain(delays)
            .chain(std::iter::once(ParamTarget::MasterVolume))
    }
}

/// Control-to-render messages. `Copy` so draining the queue never frees memory.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ControlMessage {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
    AllNotesOff,
    SetParam { target: ParamTarget, value: f32 },
    SetWaveform { slot: Slot, waveform: Waveform },
    SetEnvelopeLfo { slot: Slot, shape: EnvelopeLfo },
    SetFilterLfo { slot: Slot, shape: LfoShape },
    SetDelayLfo { slot: Slot, shape: LfoShape },
    SetRoute { route: Route, state: RouteState },
    LoadPreset(Preset),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<ControlMessage>;
}

impl MessageReceiver for Consumer<ControlMessage> {
    fn pop(&mut self) -> Option<ControlMessage> {
        Consumer::pop(self).ok()
    }
}
