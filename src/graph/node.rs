/// Convert MIDI note number to frequency in Hz.
/// A4 = 440 Hz = MIDI note 69
#[inline]
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Context passed to graph nodes during rendering.
///
/// The engine renders at one fixed rate, so the context only carries the
/// sample rate. Note pitch and velocity live in the oscillator nodes, which
/// receive them through explicit note events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }

    /// Seconds per sample.
    #[inline]
    pub fn sample_period(&self) -> f32 {
        1.0 / self.sample_rate
    }
}

/// Trait for nodes that accept a modulation input from the routing matrix.
///
/// Each parameter has a neutral value that the node falls back to when the
/// route feeding it is disabled.
pub trait Modulatable: Send {
    type Param: Copy + Send;

    fn get_param(&self, param: Self::Param) -> f32;

    fn apply_modulation(&mut self, param: Self::Param, modulation: f32);

    /// Return the modulation input to its neutral value.
    fn reset_modulation(&mut self, param: Self::Param);
}

/// Core trait for signal modules evaluated by the engine.
///
/// Evaluation is per sample because routing changes which module feeds which
/// and the engine walks the resolved graph once per output sample.
pub trait GraphNode: Send {
    /// Consume the summed input for this sample and produce an output.
    ///
    /// Sources ignore `input`.
    fn next_sample(&mut self, input: f32, ctx: &RenderCtx) -> f32;

    /// Process a block in place, one sample at a time.
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(*sample, ctx);
        }
    }

    /// Clear internal history (phase, delay memory, filter state).
    fn reset(&mut self) {}
}
