use crate::{
    dsp::oscillator::{OscillatorBlock, Waveform},
    graph::node::{midi_note_to_freq, GraphNode, Modulatable, RenderCtx},
    param::{Param, AMPLITUDE, FREQUENCY},
};

/*
Monophonic Oscillator
=====================

The oscillator is the only audio source in the patch. Everything after it
(filter, delay, mixer) shapes what it produces.

Waveforms
---------

  SINE   Pure fundamental, no overtones.
  TRI    Soft, odd harmonics falling off as 1/n².
  SAW    Bright, every harmonic, falling off as 1/n.
  PLS    Square at 50% duty, hollow, odd harmonics only.
  NOISE  Unpitched white noise. Frequency is ignored.

The waveforms are naive (not band-limited). At high notes the saw and pulse
alias audibly, which is part of the instrument's character.


Note Tracking
-------------

The oscillator keeps the set of keys currently held:

    note_on(n)    add n, retune to n, gain = velocity / 127
    note_off(n)   remove n
                    set now empty   → silent (amplitude 0)
                    otherwise       → retune to the HIGHEST key still held

So the newest key always speaks, and releasing it falls back to the highest
remaining key rather than the most recent one. Releasing a key that is not
held does nothing.

Amplitude
---------

    live amplitude = base amplitude · velocity gain        (while playing)
    output         = live amplitude · waveform · modulation

`modulation` is the envelope routed into the oscillator (1.0 when no route
drives it, so the tone passes through unchanged).

Tuning
------

Manual tuning (`set_frequency`) and note pitch are kept apart. A held key
always wins; the tuning only sounds while no key is down, so loading a
patch mid-note never bends the note.
*/

/// Fixed-size set of held MIDI keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveNotes(u128);

impl ActiveNotes {
    pub fn insert(&mut self, note: u8) {
        if note < 128 {
            self.0 |= 1u128 << note;
        }
    }

    /// Returns true if the note was held.
    pub fn remove(&mut self, note: u8) -> bool {
        let held = self.contains(note);
        if held {
            self.0 &= !(1u128 << note);
        }
        held
    }

    pub fn contains(&self, note: u8) -> bool {
        note < 128 && self.0 & (1u128 << note) != 0
    }

    pub fn highest(&self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(127 - self.0.leading_zeros() as u8)
        }
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Parameters that can be modulated on an oscillator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscParam {
    /// Gain multiplier applied after the velocity-scaled amplitude
    Amplitude,
}

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    tuning: f32,
    base_amplitude: Param,
    amplitude: f32,
    velocity_gain: f32,
    amplitude_modulation: f32,
    notes: ActiveNotes,
}

impl OscNode {
    pub fn new(waveform: Waveform, noise_seed: u32) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform, noise_seed),
            frequency: FREQUENCY.default,
            tuning: FREQUENCY.default,
            base_amplitude: Param::new(AMPLITUDE),
            amplitude: 0.0,
            velocity_gain: 0.0,
            amplitude_modulation: 1.0,
            notes: ActiveNotes::default(),
        }
    }

    pub fn sine() -> Self {
        Self::new(Waveform::Sine, 1)
    }

    pub fn sawtooth() -> Self {
        Self::new(Waveform::Sawtooth, 1)
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        if note > 127 {
            return;
        }
        self.notes.insert(note);
        self.frequency = midi_note_to_freq(note);
        self.velocity_gain = velocity.min(127) as f32 / 127.0;
        self.amplitude = self.base_amplitude.get() * self.velocity_gain;
    }

    pub fn note_off(&mut self, note: u8) {
        if !self.notes.remove(note) {
            return;
        }
        match self.notes.highest() {
            Some(highest) => self.frequency = midi_note_to_freq(highest),
            None => {
                self.frequency = self.tuning;
                self.amplitude = 0.0;
            }
        }
    }

    /// Release every held key at once.
    pub fn all_notes_off(&mut self) {
        self.notes.clear();
        self.frequency = self.tuning;
        self.amplitude = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        !self.notes.is_empty()
    }

    pub fn active_notes(&self) -> ActiveNotes {
        self.notes
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.osc.set_waveform(waveform);
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    /// Manual tuning. Clamped to the frequency range, unlike note pitches,
    /// and only heard while no key is held.
    pub fn set_frequency(&mut self, hz: f32) -> f32 {
        self.tuning = FREQUENCY.clamp(hz);
        if !self.is_playing() {
            self.frequency = self.tuning;
        }
        self.tuning
    }

    /// Pitch currently driving the oscillator.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn tuning(&self) -> f32 {
        self.tuning
    }

    /// Set the base amplitude. While a note is held the live amplitude follows.
    pub fn set_amplitude(&mut self, amplitude: f32) -> f32 {
        let base = self.base_amplitude.set(amplitude);
        if self.is_playing() {
            self.amplitude = base * self.velocity_gain;
        }
        base
    }

    pub fn base_amplitude(&self) -> f32 {
        self.base_amplitude.get()
    }

    /// Velocity-scaled amplitude, 0 when no key is held.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn phase(&self) -> f64 {
        self.osc.phase()
    }
}

impl GraphNode for OscNode {
    #[inline]
    fn next_sample(&mut self, _input: f32, ctx: &RenderCtx) -> f32 {
        let value = self.osc.next_sample(self.frequency, ctx.sample_rate);
        self.amplitude * value * self.amplitude_modulation
    }

    fn reset(&mut self) {
        self.osc.reset();
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Amplitude => self.amplitude_modulation,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, modulation: f32) {
        match param {
            OscParam::Amplitude => self.amplitude_modulation = modulation,
        }
    }

    fn reset_modulation(&mut self, param: Self::Param) {
        match param {
            OscParam::Amplitude => self.amplitude_modulation = 1.0,
        }
    }
}
