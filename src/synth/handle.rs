use std::sync::Arc;

use rtrb::Producer;

use crate::{
    dsp::{delay::TimeDivision, lfo::LfoShape, oscillator::Waveform},
    error::{EngineError, Result},
    graph::envelope::EnvelopeLfo,
    param::ROUTE_WEIGHT,
    patch::Preset,
    routing::{Route, RouteState},
    synth::{
        config::EngineConfig,
        message::{ControlMessage, DelaySetting, ParamTarget, Slot},
        stats::EngineStats,
    },
};

/// Control-side half of the engine.
///
/// Every setter validates and clamps its input, pushes one message for the
/// render thread, and only then records the new value in a local [`Preset`]
/// mirror. Getters read the mirror, so they never wait on the audio thread
/// and always agree with what has been handed to it.
pub struct EngineHandle {
    tx: Producer<ControlMessage>,
    mirror: Preset,
    stats: Arc<EngineStats>,
    config: EngineConfig,
}

impl EngineHandle {
    pub(crate) fn new(
        tx: Producer<ControlMessage>,
        stats: Arc<EngineStats>,
        config: EngineConfig,
    ) -> Self {
        Self {
            tx,
            mirror: Preset::default(),
            stats,
            config,
        }
    }

    fn send(&mut self, msg: ControlMessage) -> Result<()> {
        self.tx.push(msg).map_err(|_| {
            log::warn!(target: "kluster::handle", "control queue full, dropped {msg:?}");
            EngineError::QueueFull
        })
    }

    fn route(name: &str) -> Result<Route> {
        name.parse::<Route>().map_err(|err| {
            log::warn!(target: "kluster::routing", "{err}");
            EngineError::from(err)
        })
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) -> Result<()> {
        self.send(ControlMessage::NoteOn { note, velocity })
    }

    pub fn note_off(&mut self, note: u8) -> Result<()> {
        self.send(ControlMessage::NoteOff { note })
    }

    pub fn all_notes_off(&mut self) -> Result<()> {
        self.send(ControlMessage::AllNotesOff)
    }

    /// Forward an already-built message, keeping the mirror in step.
    pub fn send_message(&mut self, msg: ControlMessage) -> Result<()> {
        match msg {
            ControlMessage::SetParam { target, value } => self.set_param(target, value).map(|_| ()),
            ControlMessage::LoadPreset(preset) => self.load_preset(preset),
            ControlMessage::SetWaveform { slot, waveform } => self.set_waveform(slot, waveform),
            ControlMessage::SetEnvelopeLfo { slot, shape } => self.set_envelope_lfo(slot, shape),
            ControlMessage::SetFilterLfo { slot, shape } => self.set_filter_lfo(slot, shape),
            ControlMessage::SetDelayLfo { slot, shape } => self.set_delay_lfo(slot, shape),
            ControlMessage::SetRoute { route, state } => self.set_route_state(route, state),
            ControlMessage::NoteOn { .. }
            | ControlMessage::NoteOff { .. }
            | ControlMessage::AllNotesOff => self.send(msg),
        }
    }

    /// Clamp, send and return the value the engine will use.
    pub fn set_param(&mut self, target: ParamTarget, value: f32) -> Result<f32> {
        let value = target.range().clamp(value);
        self.send(ControlMessage::SetParam { target, value })?;
        self.mirror.set_param(target, value);
        Ok(value)
    }

    pub fn param(&self, target: ParamTarget) -> f32 {
        self.mirror.param(target)
    }

    pub fn set_master_volume(&mut self, volume: f32) -> Result<f32> {
        self.set_param(ParamTarget::MasterVolume, volume)
    }

    pub fn master_volume(&self) -> f32 {
        self.mirror.master_volume
    }

    pub fn set_waveform(&mut self, slot: Slot, waveform: Waveform) -> Result<()> {
        self.send(ControlMessage::SetWaveform { slot, waveform })?;
        self.mirror.oscillators[slot.index()].waveform = waveform;
        Ok(())
    }

    pub fn set_envelope_lfo(&mut self, slot: Slot, shape: EnvelopeLfo) -> Result<()> {
        self.send(ControlMessage::SetEnvelopeLfo { slot, shape })?;
        self.mirror.envelopes[slot.index()].lfo = shape;
        Ok(())
    }

    pub fn set_filter_lfo(&mut self, slot: Slot, shape: LfoShape) -> Result<()> {
        self.send(ControlMessage::SetFilterLfo { slot, shape })?;
        self.mirror.filters[slot.index()].lfo = shape;
        Ok(())
    }

    pub fn set_delay_lfo(&mut self, slot: Slot, shape: LfoShape) -> Result<()> {
        self.send(ControlMessage::SetDelayLfo { slot, shape })?;
        self.mirror.delays[slot.index()].lfo = shape;
        Ok(())
    }

    /// Tempo-synced delay time. Returns the time in seconds after clamping.
    pub fn set_delay_division(&mut self, slot: Slot, division: TimeDivision, bpm: f32) -> Result<f32> {
        self.set_param(
            ParamTarget::Delay(slot, DelaySetting::Time),
            division.seconds(bpm),
        )
    }

    /// Flip a route and return its new state.
    pub fn toggle_route(&mut self, name: &str) -> Result<bool> {
        let route = Self::route(name)?;
        let mut state = self.mirror.routing.state(route);
        state.enabled = !state.enabled;
        self.set_route_state(route, state)?;
        Ok(state.enabled)
    }

    pub fn set_route(&mut self, name: &str, enabled: bool) -> Result<()> {
        let route = Self::route(name)?;
        let state = RouteState {
            enabled,
            ..self.mirror.routing.state(route)
        };
        self.set_route_state(route, state)
    }

    pub fn get_route(&self, name: &str) -> Result<bool> {
        let route = Self::route(name)?;
        Ok(self.mirror.routing.is_enabled(route))
    }

    /// Returns the stored weight after clamping.
    pub fn set_route_weight(&mut self, name: &str, weight: f32) -> Result<f32> {
        let route = Self::route(name)?;
        let mut state = self.mirror.routing.state(route);
        state.weight = ROUTE_WEIGHT.clamp(weight);
        self.set_route_state(route, state)?;
        Ok(state.weight)
    }

    fn set_route_state(&mut self, route: Route, state: RouteState) -> Result<()> {
        self.send(ControlMessage::SetRoute { route, state })?;
        self.mirror.routing.set_state(route, state);
        log::debug!(
            target: "kluster::routing",
            "{route} -> {} (weight {})",
            if state.enabled { "on" } else { "off" },
            state.weight
        );
        Ok(())
    }

    pub fn route_names(&self) -> impl Iterator<Item = &'static str> {
        Route::ALL.into_iter().map(Route::name)
    }

    /// Snapshot of everything the engine has been told.
    pub fn preset(&self) -> Preset {
        self.mirror
    }

    /// Replace every setting at once. Out-of-range values are clamped first.
    pub fn load_preset(&mut self, preset: Preset) -> Result<()> {
        let preset = preset.sanitized();
        self.send(ControlMessage::LoadPreset(preset))?;
        self.mirror = preset;
        log::debug!(target: "kluster::preset", "preset loaded");
        Ok(())
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Messages the render side has not picked up yet.
    pub fn pending(&self) -> usize {
        self.tx.buffer().capacity() - self.tx.slots()
    }
}
