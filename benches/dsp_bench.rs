//! Criterion benches for the kluster engine: `cargo bench`.
//!
//! The engine evaluates every module per sample, so these numbers decide
//! whether a block finishes inside its callback deadline. At 48 kHz a
//! 64-frame block has 1.33 ms, 128 frames 2.67 ms, 256 frames 5.33 ms and
//! 512 frames 10.67 ms.
//!
//! `dsp/*` covers the primitives (oscillator, filter, envelope, delay);
//! `scenarios/*` drives the whole engine under different patches.

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Typical host callback sizes.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

criterion_group!(
    benches,
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_envelope,
    dsp::bench_delay,
    scenarios::bench_engine,
    scenarios::bench_routing,
);
criterion_main!(benches);
