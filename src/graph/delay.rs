use crate::{
    dsp::{
        delay::DelayLine,
        lfo::{Lfo, LfoShape},
    },
    graph::node::{GraphNode, RenderCtx},
    param::{Param, DELAY_FEEDBACK, DELAY_MIX, DELAY_TIME, LFO_DEPTH, LFO_RATE},
};

/// Feedback delay whose read time wobbles with an LFO.
///
/// Per sample:
///
/// ```text
/// time'   = clamp(time · (1 + lfo · lfo_amount))     within the time range
/// delayed = line[write − round(time' · sr)]          at least one sample back
/// line   <- input + delayed · feedback
/// output  = input · (1 − mix) + delayed · mix
/// ```
///
/// The line is sized for the whole time range up front, so nothing is
/// allocated once the node is built.
pub struct DelayNode {
    line: DelayLine,
    lfo: Lfo,
    lfo_shape: LfoShape,
    sample_rate: f32,
    time: Param,
    feedback: Param,
    mix: Param,
    lfo_amount: Param,
    time_rate_fine: Param,
    time_rate_coarse: Param,
}

/// LFO pulse duty cycle for the time wobble.
const PULSE_WIDTH: f32 = 0.5;

impl DelayNode {
    /// `max_time` below the time range's maximum is raised to it.
    pub fn new(sample_rate: f32, max_time: f32) -> Self {
        let max_time = max_time.max(DELAY_TIME.max);
        Self {
            line: DelayLine::new(max_time, sample_rate),
            lfo: Lfo::new(),
            lfo_shape: LfoShape::Sine,
            sample_rate,
            time: Param::new(DELAY_TIME),
            feedback: Param::new(DELAY_FEEDBACK),
            mix: Param::new(DELAY_MIX),
            lfo_amount: Param::new(LFO_DEPTH),
            time_rate_fine: Param::new(LFO_RATE),
            time_rate_coarse: Param::new(LFO_RATE),
        }
    }

    pub fn set_time(&mut self, seconds: f32) -> f32 {
        let time = self.time.set(seconds);
        self.line
            .ensure_len(DelayLine::required_len(time, self.sample_rate));
        time
    }

    pub fn time(&self) -> f32 {
        self.time.get()
    }

    pub fn set_feedback(&mut self, feedback: f32) -> f32 {
        self.feedback.set(feedback)
    }

    pub fn feedback(&self) -> f32 {
        self.feedback.get()
    }

    pub fn set_mix(&mut self, mix: f32) -> f32 {
        self.mix.set(mix)
    }

    pub fn mix(&self) -> f32 {
        self.mix.get()
    }

    pub fn set_lfo_amount(&mut self, amount: f32) -> f32 {
        self.lfo_amount.set(amount)
    }

    pub fn set_lfo_shape(&mut self, shape: LfoShape) {
        self.lfo_shape = shape;
    }

    pub fn lfo_shape(&self) -> LfoShape {
        self.lfo_shape
    }

    pub fn set_time_rate_fine(&mut self, hz: f32) -> f32 {
        self.time_rate_fine.set(hz)
    }

    pub fn set_time_rate_coarse(&mut self, hz: f32) -> f32 {
        self.time_rate_coarse.set(hz)
    }

    pub fn buffer_len(&self) -> usize {
        self.line.len()
    }

    fn modulated_time(&self, lfo: f32) -> f32 {
        DELAY_TIME.clamp(self.time.get() * (1.0 + lfo * self.lfo_amount.get()))
    }
}

impl GraphNode for DelayNode {
    #[inline]
    fn next_sample(&mut self, input: f32, ctx: &RenderCtx) -> f32 {
        let rate = self.time_rate_fine.get() + self.time_rate_coarse.get();
        let lfo = self.lfo.next(self.lfo_shape, rate, ctx.sample_rate, PULSE_WIDTH);

        let delay = self
            .line
            .delay_samples(self.modulated_time(lfo), ctx.sample_rate);
        let delayed = self.line.next_sample(input, delay, self.feedback.get());

        let mix = self.mix.get();
        input * (1.0 - mix) + delayed * mix
    }

    fn reset(&mut self) {
        self.line.reset();
        self.lfo.reset();
    }
}
