//! Modules the engine wires together.
//!
//! Graph nodes wrap the low-level DSP primitives with what the patch needs:
//! clamped parameters, note events, per-module LFOs and modulation inputs.
//! Signal modules implement [`node::GraphNode`]; the envelope is a pure
//! modulation source and is ticked by the engine directly.

/// Modulated feedback delay.
pub mod delay;
/// ADSR envelope blended with its own LFO.
pub mod envelope;
/// Low-pass with LFO and envelope swept cutoff.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Note-tracking audio oscillator.
pub mod oscillator;
