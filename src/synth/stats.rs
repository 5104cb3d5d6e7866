use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared between the render thread and everyone else.
///
/// Only relaxed atomics: the numbers are for display and diagnostics, never
/// for synchronization.
#[derive(Debug, Default)]
pub struct EngineStats {
    blocks_rendered: AtomicU64,
    frames_rendered: AtomicU64,
    dropouts: AtomicU64,
}

impl EngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_block(&self, frames: usize) {
        self.blocks_rendered.fetch_add(1, Ordering::Relaxed);
        self.frames_rendered
            .fetch_add(frames as u64, Ordering::Relaxed);
    }

    /// Called by the audio host when it reports an underrun.
    pub fn record_dropout(&self) {
        self.dropouts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn blocks_rendered(&self) -> u64 {
        self.blocks_rendered.load(Ordering::Relaxed)
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    pub fn dropouts(&self) -> u64 {
        self.dropouts.load(Ordering::Relaxed)
    }
}
