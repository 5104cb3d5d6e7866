//! Benchmarks for the low-pass biquad, fixed and swept.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kluster_dsp::dsp::filter::BiquadLowPass;
use kluster_dsp::graph::{
    filter::FilterNode,
    node::{GraphNode, RenderCtx},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Coefficients computed once per block
        let mut filter = BiquadLowPass::new();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), 1_000.0, 0.5, black_box(&ctx));
            })
        });

        // LFO sweep: coefficients recomputed every sample
        let mut node = FilterNode::new();
        node.set_resonance(0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("swept", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                node.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
