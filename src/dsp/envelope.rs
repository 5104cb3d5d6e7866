use crate::{
    graph::node::RenderCtx,
    param::{Param, ATTACK, DECAY, RELEASE, SUSTAIN},
};

/*
Linear ADSR
===========

A linear ADSR envelope generator. Its level is used as a modulation source:
routed into a filter's cutoff or an oscillator's amplitude.

Terms
-----

  level          The envelope's current output value (0.0 to 1.0).

  stage          Which phase of the envelope we're in: Idle, Attack, Decay,
                 Sustain, or Release. A state machine governs transitions.

  release level  The level captured when the release (or a re-trigger out of
                 release) began. The release slope is scaled by it.

  dt             Seconds per sample: 1 / sample_rate.


Per-sample Update
-----------------

    Attack   level += dt / attack                       → Decay   at level ≥ 1
    Decay    level -= (dt / decay) · (1 − sustain)       → Sustain at level ≤ S
    Sustain  level  = sustain
    Release  level -= (dt / release) · release_level     → Idle    at level ≤ 0

Both the decay and the release slopes are straight lines whose steepness is
fixed by the segment they cover, not by the instantaneous level. A release
that starts at 0.5 takes exactly `release` seconds to reach zero, and so does
one that starts at 1.0. The decay takes `decay` seconds for any sustain
level. This is the intended character of the envelope and must not be
replaced by an exponential curve.


Stages
------

    ┌──────┐  note_on   ┌────────┐  level≥1   ┌───────┐  level≤S  ┌─────────┐
    │ Idle │ ─────────→ │ Attack │ ─────────→ │ Decay │ ────────→ │ Sustain │
    └──────┘            └────────┘            └───────┘           └─────────┘
        ↑                    ↑                                          │
        │ level≤0            │ note_on (continue from level)            │ note_off
        │               ┌─────────┐                                     │
        └────────────── │ Release │ ←───────────────────────────────────┘
                        └─────────┘

note_off enters Release from any non-idle stage.

Re-trigger policy: a note_on that arrives while releasing goes back to Attack
WITHOUT resetting the level, so the new note swells up from wherever the old
one had fallen to. A note_on from any other stage restarts from zero.
*/

/// Stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    /// Holds the live sustain value, so sustain edits apply immediately.
    Sustain,
    Release,
}

pub struct Envelope {
    attack: Param,
    decay: Param,
    sustain: Param,
    release: Param,

    stage: EnvelopeStage,
    level: f32,
    release_level: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            attack: Param::new(ATTACK),
            decay: Param::new(DECAY),
            sustain: Param::new(SUSTAIN),
            release: Param::new(RELEASE),

            stage: EnvelopeStage::Idle,
            level: 0.0,
            release_level: 0.0,
        }
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self::new();
        env.set_attack(attack);
        env.set_decay(decay);
        env.set_sustain(sustain);
        env.set_release(release);
        env
    }

    /// Gate high.
    pub fn note_on(&mut self) {
        if self.stage == EnvelopeStage::Release {
            self.release_level = self.level;
        } else {
            self.level = 0.0;
        }
        self.stage = EnvelopeStage::Attack;
    }

    /// Gate low: start the release from the current level.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeStage::Idle {
            return;
        }
        self.release_level = self.level;
        self.stage = EnvelopeStage::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        let dt = ctx.sample_period();

        match self.stage {
            EnvelopeStage::Idle => {
                self.level = 0.0;
            }

            EnvelopeStage::Attack => {
                self.level += dt / self.attack.get();
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeStage::Decay;
                }
            }

            EnvelopeStage::Decay => {
                let sustain = self.sustain.get();
                self.level -= (dt / self.decay.get()) * (1.0 - sustain);
                if self.level <= sustain {
                    self.level = sustain;
                    self.stage = EnvelopeStage::Sustain;
                }
            }

            EnvelopeStage::Sustain => {
                self.level = self.sustain.get();
            }

            EnvelopeStage::Release => {
                self.level -= (dt / self.release.get()) * self.release_level;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    /// True while the envelope is anywhere but Idle.
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeStage::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.level = 0.0;
        self.release_level = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn release_level(&self) -> f32 {
        self.release_level
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn set_attack(&mut self, seconds: f32) -> f32 {
        self.attack.set(seconds)
    }

    pub fn set_decay(&mut self, seconds: f32) -> f32 {
        self.decay.set(seconds)
    }

    pub fn set_sustain(&mut self, level: f32) -> f32 {
        self.sustain.set(level)
    }

    pub fn set_release(&mut self, seconds: f32) -> f32 {
        self.release.set(seconds)
    }

    pub fn attack(&self) -> f32 {
        self.attack.get()
    }

    pub fn decay(&self) -> f32 {
        self.decay.get()
    }

    pub fn sustain(&self) -> f32 {
        self.sustain.get()
    }

    pub fn release(&self) -> f32 {
        self.release.get()
    }
}
