//! Benchmarks for the ADSR envelope generator and its LFO blend.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use kluster_dsp::dsp::envelope::Envelope;
use kluster_dsp::graph::{
    envelope::{EnvNode, EnvelopeLfo},
    node::RenderCtx,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let ctx = RenderCtx::new(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Attack phase (ramping up)
        let mut env = Envelope::adsr(0.1, 0.1, 0.7, 0.3);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Release phase (ramping down)
        let mut env = Envelope::adsr(0.001, 0.001, 0.7, 0.1);
        env.note_on();
        for _ in 0..200 {
            env.next_sample(&ctx);
        }
        env.note_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                env.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // ADSR blended with a sine LFO
        let mut node = EnvNode::new();
        node.set_lfo_shape(EnvelopeLfo::Sine);
        node.note_on();
        group.bench_with_input(BenchmarkId::new("lfo_blend", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = node.next_value(black_box(&ctx));
                }
            })
        });
    }

    group.finish();
}
