//! Whole-engine scenario benchmarks.
//!
//! These render through `SynthEngine` exactly as an audio callback would,
//! including the message drain at the top of every block.

mod engine;
mod routing;

pub use engine::bench_engine;
pub use routing::bench_routing;
