use std::sync::Arc;

use rtrb::{Consumer, RingBuffer};

use crate::{
    graph::{
        delay::DelayNode,
        envelope::EnvNode,
        filter::{FilterNode, FilterParam},
        node::{GraphNode, Modulatable, RenderCtx},
        oscillator::{OscNode, OscParam},
    },
    param::{Param, MASTER_VOLUME},
    patch::Preset,
    routing::{ModTarget, ModuleId, RoutingTable, SignalGraph},
    synth::{
        config::{EngineConfig, ModulationRate},
        handle::EngineHandle,
        message::{
            ControlMessage, DelaySetting, EnvelopeSetting, FilterSetting, MessageReceiver,
            OscillatorSetting, ParamTarget, Slot,
        },
        stats::EngineStats,
    },
    MAX_BLOCK_SIZE,
};

const MAX_NOTE: u8 = 127;

/*
Render Engine
=============

The engine owns every module and is moved into the audio callback. The
control side talks to it only through `ControlMessage`s on a lock-free SPSC
ring buffer, drained at the top of each block:

    render(out)
      1. pop every pending message and apply it
         routing changed?  → re-resolve the SignalGraph once
      2. for each sample
           tick both envelopes
           push envelope values into routed targets   (per sample or per block)
           walk graph.order(), summing each output into its destination
           out = mixer input · master volume

Nothing in `render` allocates, locks, blocks or logs. Modules that do not
reach the mixer are skipped, so their phases and histories freeze until a
route brings them back.

Notes go to both lanes: each oscillator tracks the held keys and both
envelopes are gated together. The envelopes are released only when the last
held key goes up. Keys above 127 are dropped before they reach either, so
the gate and the held-key set can never disagree.
*/

pub struct SynthEngine {
    ctx: RenderCtx,
    modulation_rate: ModulationRate,
    rx: Consumer<ControlMessage>,

    oscillators: [OscNode; 2],
    envelopes: [EnvNode; 2],
    filters: [FilterNode; 2],
    delays: [DelayNode; 2],
    master_volume: Param,

    routing: RoutingTable,
    graph: SignalGraph,

    scratch: Vec<f32>,
    stats: Arc<EngineStats>,
}

impl SynthEngine {
    /// Build the engine with factory settings and the handle that controls it.
    pub fn new(config: EngineConfig) -> (Self, EngineHandle) {
        let config = config.sanitized();
        let (tx, rx) = RingBuffer::<ControlMessage>::new(config.queue_capacity);
        let stats = Arc::new(EngineStats::new());

        let seed = config.noise_seed;
        let sample_rate = config.sample_rate;
        let routing = RoutingTable::default();

        let engine = Self {
            ctx: RenderCtx::new(sample_rate),
            modulation_rate: config.modulation_rate,
            rx,
            oscillators: [
                OscNode::new(Default::default(), seed),
                OscNode::new(Default::default(), seed.wrapping_add(0x9E37_79B9)),
            ],
            envelopes: [EnvNode::new(), EnvNode::new()],
            filters: [FilterNode::new(), FilterNode::new()],
            delays: [
                DelayNode::new(sample_rate, config.max_delay_time),
                DelayNode::new(sample_rate, config.max_delay_time),
            ],
            master_volume: Param::new(MASTER_VOLUME),
            routing,
            graph: routing.resolve(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            stats: Arc::clone(&stats),
        };

        let handle = EngineHandle::new(tx, stats, config);
        (engine, handle)
    }

    /// Render one block of mono samples.
    pub fn render(&mut self, out: &mut [f32]) {
        self.drain_messages();

        let per_block = self.modulation_rate == ModulationRate::PerBlock;
        let volume = self.master_volume.get();

        for (i, sample) in out.iter_mut().enumerate() {
            self.envelopes[0].next_value(&self.ctx);
            self.envelopes[1].next_value(&self.ctx);

            if !per_block || i == 0 {
                self.apply_modulation();
            }

            *sample = self.next_frame() * volume;
        }

        self.stats.record_block(out.len());
    }

    /// Render into an interleaved buffer, copying the mono signal to every channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }

        let mut scratch = std::mem::take(&mut self.scratch);
        for chunk in data.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = chunk.len().div_ceil(channels);
            let mono = &mut scratch[..frames];
            self.render(mono);

            for (frame, &sample) in chunk.chunks_mut(channels).zip(mono.iter()) {
                frame.fill(sample);
            }
        }
        self.scratch = scratch;
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    pub fn routing(&self) -> &RoutingTable {
        &self.routing
    }

    pub fn graph(&self) -> &SignalGraph {
        &self.graph
    }

    pub fn stats(&self) -> Arc<EngineStats> {
        Arc::clone(&self.stats)
    }

    pub fn oscillator(&self, slot: Slot) -> &OscNode {
        &self.oscillators[slot.index()]
    }

    pub fn envelope(&self, slot: Slot) -> &EnvNode {
        &self.envelopes[slot.index()]
    }

    pub fn filter(&self, slot: Slot) -> &FilterNode {
        &self.filters[slot.index()]
    }

    pub fn delay(&self, slot: Slot) -> &DelayNode {
        &self.delays[slot.index()]
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume.get()
    }

    fn drain_messages(&mut self) {
        let mut routing_changed = false;
        while let Some(msg) = MessageReceiver::pop(&mut self.rx) {
            routing_changed |= self.apply_message(msg);
        }
        if routing_changed {
            self.graph = self.routing.resolve();
        }
    }

    /// Returns true when the routing table was touched.
    fn apply_message(&mut self, msg: ControlMessage) -> bool {
        match msg {
            ControlMessage::NoteOn { note, .. } | ControlMessage::NoteOff { note }
                if note > MAX_NOTE => {}
            ControlMessage::NoteOn { note, velocity } => {
                for osc in &mut self.oscillators {
                    osc.note_on(note, velocity);
                }
                for env in &mut self.envelopes {
                    env.note_on();
                }
            }
            ControlMessage::NoteOff { note } => {
                let was_playing = self.oscillators[0].is_playing();
                for osc in &mut self.oscillators {
                    osc.note_off(note);
                }
                if was_playing && !self.oscillators[0].is_playing() {
                    for env in &mut self.envelopes {
                        env.note_off();
                    }
                }
            }
            ControlMessage::AllNotesOff => {
                for osc in &mut self.oscillators {
                    osc.all_notes_off();
                }
                for env in &mut self.envelopes {
                    env.note_off();
                }
            }
            ControlMessage::SetParam { target, value } => self.apply_param(target, value),
            ControlMessage::SetWaveform { slot, waveform } => {
                self.oscillators[slot.index()].set_waveform(waveform);
            }
            ControlMessage::SetEnvelopeLfo { slot, shape } => {
                self.envelopes[slot.index()].set_lfo_shape(shape);
            }
            ControlMessage::SetFilterLfo { slot, shape } => {
                self.filters[slot.index()].set_lfo_shape(shape);
            }
            ControlMessage::SetDelayLfo { slot, shape } => {
                self.delays[slot.index()].set_lfo_shape(shape);
            }
            ControlMessage::SetRoute { route, state } => {
                self.routing.set_state(route, state);
                return true;
            }
            ControlMessage::LoadPreset(preset) => {
                self.apply_preset(&preset);
                return true;
            }
        }
        false
    }

    fn apply_param(&mut self, target: ParamTarget, value: f32) {
        match target {
            ParamTarget::Oscillator(slot, setting) => {
                let osc = &mut self.oscillators[slot.index()];
                match setting {
                    OscillatorSetting::Frequency => osc.set_frequency(value),
                    OscillatorSetting::Amplitude => osc.set_amplitude(value),
                };
            }
            ParamTarget::Envelope(slot, setting) => {
                let node = &mut self.envelopes[slot.index()];
                match setting {
                    EnvelopeSetting::Attack => node.envelope_mut().set_attack(value),
                    EnvelopeSetting::Decay => node.envelope_mut().set_decay(value),
                    EnvelopeSetting::Sustain => node.envelope_mut().set_sustain(value),
                    EnvelopeSetting::Release => node.envelope_mut().set_release(value),
                    EnvelopeSetting::LfoRateFine => node.set_lfo_rate_fine(value),
                    EnvelopeSetting::LfoRateCoarse => node.set_lfo_rate_coarse(value),
                    EnvelopeSetting::LfoDepth => node.set_lfo_depth(value),
                    EnvelopeSetting::LfoWidth => node.set_lfo_width(value),
                    EnvelopeSetting::Mix => node.set_mix(value),
                };
            }
            ParamTarget::Filter(slot, setting) => {
                let filter = &mut self.filters[slot.index()];
                match setting {
                    FilterSetting::Cutoff => filter.set_cutoff(value),
                    FilterSetting::Resonance => filter.set_resonance(value),
                    FilterSetting::RateFine => filter.set_rate_fine(value),
                    FilterSetting::RateCoarse => filter.set_rate_coarse(value),
                    FilterSetting::DepthFine => filter.set_depth_fine(value),
                    FilterSetting::DepthCoarse => filter.set_depth_coarse(value),
                };
            }
            ParamTarget::Delay(slot, setting) => {
                let delay = &mut self.delays[slot.index()];
                match setting {
                    DelaySetting::Time => delay.set_time(value),
                    DelaySetting::Feedback => delay.set_feedback(value),
                    DelaySetting::Mix => delay.set_mix(value),
                    DelaySetting::LfoAmount => delay.set_lfo_amount(value),
                    DelaySetting::RateFine => delay.set_time_rate_fine(value),
                    DelaySetting::RateCoarse => delay.set_time_rate_coarse(value),
                };
            }
            ParamTarget::MasterVolume => {
                self.master_volume.set(value);
            }
        }
    }

    fn apply_preset(&mut self, preset: &Preset) {
        for target in ParamTarget::all() {
            self.apply_param(target, preset.param(target));
        }
        for slot in Slot::ALL {
            let i = slot.index();
            self.oscillators[i].set_waveform(preset.oscillators[i].waveform);
            self.envelopes[i].set_lfo_shape(preset.envelopes[i].lfo);
            self.filters[i].set_lfo_shape(preset.filters[i].lfo);
            self.delays[i].set_lfo_shape(preset.delays[i].lfo);
        }
        self.routing = preset.routing;
    }

    /// Push routed envelope values into their targets; undriven targets go neutral.
    fn apply_modulation(&mut self) {
        let mut driven = [None::<f32>; ModTarget::COUNT];
        for (source, target, weight) in self.routing.modulations() {
            let value = self.envelopes[source.index()].value() * weight;
            let slot = &mut driven[target.index()];
            *slot = Some(slot.unwrap_or(0.0) + value);
        }

        for target in ModTarget::ALL {
            let value = driven[target.index()];
            match target {
                ModTarget::Filter1Cutoff => modulate(&mut self.filters[0], FilterParam::Cutoff, value),
                ModTarget::Filter2Cutoff => modulate(&mut self.filters[1], FilterParam::Cutoff, value),
                ModTarget::Osc2Amplitude => {
                    modulate(&mut self.oscillators[1], OscParam::Amplitude, value)
                }
            }
        }
    }

    fn module_mut(&mut self, module: ModuleId) -> Option<&mut dyn GraphNode> {
        match module {
            ModuleId::Osc1 => Some(&mut self.oscillators[0]),
            ModuleId::Osc2 => Some(&mut self.oscillators[1]),
            ModuleId::Filter1 => Some(&mut self.filters[0]),
            ModuleId::Filter2 => Some(&mut self.filters[1]),
            ModuleId::Delay1 => Some(&mut self.delays[0]),
            ModuleId::Delay2 => Some(&mut self.delays[1]),
            ModuleId::Mixer => None,
        }
    }

    #[inline]
    fn next_frame(&mut self) -> f32 {
        let graph = self.graph;
        let ctx = self.ctx;
        let mut inputs = [0.0f32; ModuleId::COUNT];

        for &module in graph.order() {
            let input = inputs[module.index()];
            let Some(node) = self.module_mut(module) else {
                continue;
            };
            let output = node.next_sample(input, &ctx);
            if let Some(dest) = graph.destination(module) {
                inputs[dest.index()] += output;
            }
        }

        inputs[ModuleId::Mixer.index()]
    }
}

fn modulate<M: Modulatable>(node: &mut M, param: M::Param, value: Option<f32>) {
    match value {
        Some(value) => node.apply_modulation(param, value),
        None => node.reset_modulation(param),
    }
}
