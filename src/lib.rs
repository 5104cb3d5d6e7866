//! Monophonic two-lane synthesizer engine: oscillators, ADSR/LFO envelopes,
//! swept resonant filters and modulated feedback delays wired through a
//! switchable routing matrix.
//!
//! [`SynthEngine`] lives on the audio thread; [`EngineHandle`] is the
//! control side and talks to it through a lock-free queue.

pub mod dsp;
pub mod error;
pub mod graph; // Signal and modulation modules
pub mod io;
pub mod param;
pub mod patch;
pub mod routing;
pub mod synth; // Render engine and control handle

pub use error::{EngineError, RoutingError};
pub use patch::Preset;
pub use routing::{Route, RoutingTable};
pub use synth::{EngineConfig, EngineHandle, SynthEngine};

pub const MAX_BLOCK_SIZE: usize = 2048;
