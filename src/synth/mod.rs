// Purpose: the render engine and the control handle that drives it
// The engine runs on the audio thread; the handle stays with the UI/MIDI side

pub mod config;
pub mod engine;
pub mod handle;
pub mod message;
pub mod stats;

pub use config::{EngineConfig, ModulationRate};
pub use engine::SynthEngine;
pub use handle::EngineHandle;
pub use message::{ControlMessage, ParamTarget, Slot};
pub use stats::EngineStats;
