//! Animation descriptors.
//!
//! An [`Animation`] describes how a property moves towards a new target: the
//! easing curve, the length of one cycle, and how many extra cycles follow
//! the first. It carries no runtime state and is attached to properties by
//! value.

use serde::{Deserialize, Serialize};

use motion_config::AnimationConfig;

use super::easing::EasingFunction;
use crate::error::Result;
use crate::time::TimeMs;

/// How many times a transition cycle runs after the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Repeat {
    /// Run `count` additional cycles.
    Times { count: u32 },
    /// Cycle forever. The owning property never completes.
    Indefinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Times { count: 0 }
    }
}

impl Repeat {
    pub fn times(count: u32) -> Self {
        Self::Times { count }
    }

    pub fn is_indefinite(&self) -> bool {
        matches!(self, Self::Indefinite)
    }
}

/// Position within an animation at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSample {
    /// Linear progress within the current cycle, in [0, 1].
    pub progress: f64,
    /// Whether every cycle has elapsed.
    pub completed: bool,
}

/// Describes how a motion property transitions to a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub easing: EasingFunction,
    /// Length of one cycle in milliseconds. Zero applies changes instantly.
    pub duration_ms: u64,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            easing: EasingFunction::EaseOut,
            duration_ms: 800,
            repeat: Repeat::default(),
        }
    }
}

impl Animation {
    pub fn new(easing: EasingFunction, duration_ms: u64) -> Self {
        Self {
            easing,
            duration_ms,
            repeat: Repeat::default(),
        }
    }

    /// Zero-duration animation: targets apply on the next sample.
    pub fn instant() -> Self {
        Self::new(EasingFunction::Linear, 0)
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Build the default animation from configuration.
    pub fn from_config(config: &AnimationConfig) -> Result<Self> {
        Ok(Self {
            easing: config.easing.parse()?,
            duration_ms: config.duration_ms,
            repeat: Repeat::times(config.repeat),
        })
    }

    /// Total running time across all cycles, `None` when it never ends.
    pub fn total_duration(&self) -> Option<u64> {
        if self.duration_ms == 0 {
            return Some(0);
        }
        match self.repeat {
            Repeat::Times { count } => Some(self.duration_ms.saturating_mul(count as u64 + 1)),
            Repeat::Indefinite => None,
        }
    }

    /// Locate `elapsed` milliseconds after the transition started.
    ///
    /// Cycles are derived from elapsed time alone, so uneven frame spacing
    /// never accumulates drift. Negative elapsed time samples the start.
    pub fn sample(&self, elapsed: TimeMs) -> AnimationSample {
        if self.duration_ms == 0 {
            return AnimationSample {
                progress: 1.0,
                completed: true,
            };
        }
        if elapsed <= 0 {
            return AnimationSample {
                progress: 0.0,
                completed: false,
            };
        }

        let elapsed = elapsed as u64;
        if let Some(total) = self.total_duration() {
            if elapsed >= total {
                return AnimationSample {
                    progress: 1.0,
                    completed: true,
                };
            }
        }

        let in_cycle = elapsed % self.duration_ms;
        AnimationSample {
            progress: in_cycle as f64 / self.duration_ms as f64,
            completed: false,
        }
    }

    /// Eased progress at `elapsed` milliseconds, plus completion.
    pub fn eased(&self, elapsed: TimeMs) -> (f64, bool) {
        let sample = self.sample(elapsed);
        (self.easing.evaluate(sample.progress), sample.completed)
    }
}
