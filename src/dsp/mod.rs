//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once built and realtime-safe. They
//! stay focused on the signal-processing math; the graph nodes layer
//! parameters, modulation and note handling on top.

/// Circular-buffer delay line and tempo divisions.
pub mod delay;
/// Linear attack/decay/sustain/release envelope generator.
pub mod envelope;
/// Normalized RBJ low-pass biquad.
pub mod filter;
/// Control-rate oscillators shared by the modulated modules.
pub mod lfo;
/// Oscillator waveforms and noise sources.
pub mod oscillator;

pub use envelope::EnvelopeStage;
