//! Benchmarks for the delay line and the modulated delay node.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kluster_dsp::dsp::delay::DelayLine;
use kluster_dsp::graph::{
    delay::DelayNode,
    node::{GraphNode, RenderCtx},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| ((i % 32) as f32 / 16.0) - 1.0).collect();

        // Plain delay line: read, write, advance
        let mut line = DelayLine::new(2.0, SAMPLE_RATE);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("line", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                line.render(black_box(&mut buffer), 12_000);
            })
        });

        // Full node: LFO-modulated time, feedback and mix
        let mut node = DelayNode::new(SAMPLE_RATE, 2.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                node.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
