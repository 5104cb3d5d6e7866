#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// Note value a tempo-synced delay time is derived from. `T` marks triplets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeDivision {
    Half,
    #[default]
    Quarter,
    QuarterTriplet,
    Eighth,
    EighthTriplet,
    Sixteenth,
    SixteenthTriplet,
    ThirtySecond,
    ThirtySecondTriplet,
    SixtyFourth,
}

impl TimeDivision {
    pub const ALL: [TimeDivision; 10] = [
        TimeDivision::Half,
        TimeDivision::Quarter,
        TimeDivision::QuarterTriplet,
        TimeDivision::Eighth,
        TimeDivision::EighthTriplet,
        TimeDivision::Sixteenth,
        TimeDivision::SixteenthTriplet,
        TimeDivision::ThirtySecond,
        TimeDivision::ThirtySecondTriplet,
        TimeDivision::SixtyFourth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeDivision::Half => "1/2",
            TimeDivision::Quarter => "1/4",
            TimeDivision::QuarterTriplet => "1/4T",
            TimeDivision::Eighth => "1/8",
            TimeDivision::EighthTriplet => "1/8T",
            TimeDivision::Sixteenth => "1/16",
            TimeDivision::SixteenthTriplet => "1/16T",
            TimeDivision::ThirtySecond => "1/32",
            TimeDivision::ThirtySecondTriplet => "1/32T",
            TimeDivision::SixtyFourth => "1/64",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    /// Length in quarter-note beats.
    pub fn beats(self) -> f32 {
        match self {
            TimeDivision::Half => 2.0,
            TimeDivision::Quarter => 1.0,
            TimeDivision::QuarterTriplet => 2.0 / 3.0,
            TimeDivision::Eighth => 0.5,
            TimeDivision::EighthTriplet => 1.0 / 3.0,
            TimeDivision::Sixteenth => 0.25,
            TimeDivision::SixteenthTriplet => 1.0 / 6.0,
            TimeDivision::ThirtySecond => 0.125,
            TimeDivision::ThirtySecondTriplet => 1.0 / 12.0,
            TimeDivision::SixtyFourth => 0.0625,
        }
    }

    /// Delay time in seconds at `bpm`. Non-positive tempos give 0.
    pub fn seconds(self, bpm: f32) -> f32 {
        if bpm > 0.0 {
            self.beats() * 60.0 / bpm
        } else {
            0.0
        }
    }
}

impl fmt::Display for TimeDivision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Circular sample buffer with a single write head.
///
/// Reads happen before the write of the current sample, so a delay of `len`
/// samples returns the oldest sample still in the buffer and a delay of 1
/// returns the previous input.
pub struct DelayLine {
    buffer: Vec<f32>,
    write_index: usize,
}

impl DelayLine {
    /// Buffer long enough for `max_seconds` at `sample_rate`.
    pub fn new(max_seconds: f32, sample_rate: f32) -> Self {
        Self::with_len(Self::required_len(max_seconds, sample_rate))
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            write_index: 0,
        }
    }

    /// Samples needed to hold `seconds` of audio: `ceil(seconds * sample_rate)`.
    pub fn required_len(seconds: f32, sample_rate: f32) -> usize {
        ((seconds.max(0.0) as f64 * sample_rate as f64).ceil() as usize).max(1)
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Grow the buffer to at least `len` samples. Never shrinks.
    ///
    /// New zeroed samples are spliced in at the write head, which is where
    /// the oldest audio lives, so every delay shorter than the old length
    /// keeps reading the same history. Allocates: call from the control side.
    pub fn ensure_len(&mut self, len: usize) {
        let current = self.buffer.len();
        if len <= current {
            return;
        }
        let at = self.write_index;
        self.buffer
            .splice(at..at, std::iter::repeat(0.0).take(len - current));
        self.write_index %= self.buffer.len();
    }

    /// Whole-sample delay for `seconds`, rounded and kept inside `1..=len`.
    #[inline]
    pub fn delay_samples(&self, seconds: f32, sample_rate: f32) -> usize {
        let samples = (seconds.max(0.0) * sample_rate).round() as usize;
        samples.clamp(1, self.buffer.len())
    }

    /// Sample written `delay_samples` writes ago.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        let delay_samples = delay_samples.clamp(1, len);
        let read_index = (self.write_index + len - delay_samples) % len;
        self.buffer[read_index]
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_index] = sample;
        self.write_index = (self.write_index + 1) % self.buffer.len();
    }

    /// Read the delayed sample, write `input + delayed * feedback`, return the delayed sample.
    #[inline]
    pub fn next_sample(&mut self, input: f32, delay_samples: usize, feedback: f32) -> f32 {
        let delayed = self.read(delay_samples);
        self.write(input + delayed * feedback);
        delayed
    }

    /// Replace a block with its delayed copy (no feedback).
    pub fn render(&mut self, buffer: &mut [f32], delay_samples: usize) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples, 0.0);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_index = 0;
    }
}
