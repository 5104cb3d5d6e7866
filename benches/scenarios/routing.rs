//! Benchmarks for graph resolution and live re-routing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kluster_dsp::{routing::RoutingTable, EngineConfig, SynthEngine};

use crate::SAMPLE_RATE;

pub fn bench_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/routing");

    let table = RoutingTable::default();
    group.bench_function("resolve", |b| {
        b.iter(|| black_box(black_box(&table).resolve()));
    });

    // A route flip every block: drain, re-resolve, render
    let size = 128;
    let mut buffer = vec![0.0f32; size];
    let (mut engine, mut handle) = SynthEngine::new(
        EngineConfig::default()
            .with_sample_rate(SAMPLE_RATE)
            .with_queue_capacity(1_024),
    );
    handle.note_on(60, 100).expect("queue has room");
    group.bench_with_input(BenchmarkId::new("toggle_per_block", size), &size, |b, _| {
        b.iter(|| {
            // Queue overflow only skips the toggle; rendering still runs
            let _ = handle.toggle_route("filter2ToDelay2");
            engine.render(black_box(&mut buffer));
        })
    });

    group.finish();
}
