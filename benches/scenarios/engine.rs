//! Benchmarks for the engine with the factory patch and a busy patch.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kluster_dsp::{
    dsp::oscillator::Waveform,
    graph::envelope::EnvelopeLfo,
    synth::{message::Slot, ModulationRate},
    EngineConfig, SynthEngine,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === FACTORY PATCH ===
        // Both lanes active, no modulation routes
        let (mut engine, mut handle) =
            SynthEngine::new(EngineConfig::default().with_sample_rate(SAMPLE_RATE));
        handle.note_on(57, 100).expect("queue has room");
        group.bench_with_input(BenchmarkId::new("factory", size), &size, |b, _| {
            b.iter(|| {
                engine.render(black_box(&mut buffer));
            })
        });

        // === EVERYTHING ON ===
        // All modulation routes, envelope LFOs running, noise on lane two
        let (mut engine, mut handle) =
            SynthEngine::new(EngineConfig::default().with_sample_rate(SAMPLE_RATE));
        for name in ["env1ToFilter1", "env1ToOsc2", "env2ToFilter2"] {
            handle.set_route(name, true).expect("known route");
        }
        handle.set_envelope_lfo(Slot::One, EnvelopeLfo::Triangle).expect("queue has room");
        handle.set_envelope_lfo(Slot::Two, EnvelopeLfo::Pulse).expect("queue has room");
        handle.set_waveform(Slot::Two, Waveform::Noise).expect("queue has room");
        handle.note_on(45, 127).expect("queue has room");
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                engine.render(black_box(&mut buffer));
            })
        });

        // === PER-BLOCK MODULATION ===
        let config = EngineConfig::default()
            .with_sample_rate(SAMPLE_RATE)
            .with_modulation_rate(ModulationRate::PerBlock);
        let (mut engine, mut handle) = SynthEngine::new(config);
        for name in ["env1ToFilter1", "env1ToOsc2", "env2ToFilter2"] {
            handle.set_route(name, true).expect("known route");
        }
        handle.note_on(45, 127).expect("queue has room");
        group.bench_with_input(BenchmarkId::new("per_block", size), &size, |b, _| {
            b.iter(|| {
                engine.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
