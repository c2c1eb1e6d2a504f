//! Motion properties.
//!
//! A [`MotionProperty`] holds one animatable value: where it came from, where
//! it is heading, when the transition started, and the animation that shapes
//! it. Its value at any instant is a pure function of the query time.
//!
//! Retargets made between frames do not know the frame time yet. They are
//! held as a pending target and the transition starts at the first
//! [`get_value`](MotionProperty::get_value) that follows.

use super::descriptor::Animation;
use super::interpolate::Interpolate;
use crate::time::TimeMs;

/// A value that transitions towards its target over time.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProperty<T> {
    from: T,
    to: T,
    start: TimeMs,
    animation: Option<Animation>,
    completed: bool,
    pending: Option<T>,
}

impl<T: Interpolate + Clone> MotionProperty<T> {
    /// A settled property with no animation attached.
    pub fn new(value: T) -> Self {
        Self {
            from: value.clone(),
            to: value,
            start: 0,
            animation: None,
            completed: true,
            pending: None,
        }
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Value at `now`, without recording completion. A pending target has
    /// not started yet, so this is still the running transition's value.
    pub fn value_at(&self, now: TimeMs) -> T {
        let Some(animation) = &self.animation else {
            return self.to.clone();
        };
        if self.completed {
            return self.to.clone();
        }

        let (eased, done) = animation.eased(now - self.start);
        if done {
            self.to.clone()
        } else {
            self.from.interpolate(&self.to, eased)
        }
    }

    /// Value at `now`. Starts a pending transition at `now` and latches the
    /// completed flag once every cycle has run.
    pub fn get_value(&mut self, now: TimeMs) -> T {
        if let Some(target) = self.pending.take() {
            self.set_value(target, now);
        }
        if !self.completed && self.is_completed_at(now) {
            self.completed = true;
        }
        self.value_at(now)
    }

    /// Whether no interpolation remains at `now`.
    pub fn is_completed_at(&self, now: TimeMs) -> bool {
        match &self.animation {
            None => true,
            Some(_) if self.pending.is_some() => false,
            Some(_) if self.completed => true,
            Some(animation) => animation.sample(now - self.start).completed,
        }
    }

    /// Retarget the property, starting the transition at `now`.
    ///
    /// Without an animation the value jumps. Otherwise the transition is
    /// re-based at the value interpolated for `now`, so retargeting mid-flight
    /// is continuous. Setting the current target again still restarts the clock.
    pub fn set_value(&mut self, target: T, now: TimeMs) {
        self.pending = None;
        let Some(animation) = self.animation else {
            self.snap(target);
            return;
        };
        self.from = self.value_at(now);
        self.to = target;
        self.start = now;
        self.completed = animation.duration_ms == 0;
    }

    /// Retarget the property without a start time.
    ///
    /// Animated properties keep their running transition until the next
    /// [`get_value`](Self::get_value), which re-bases at its `now`. Properties
    /// without an animation, or with a zero-length one, jump right away.
    pub fn set_target(&mut self, target: T) {
        let timed = self
            .animation
            .as_ref()
            .is_some_and(|animation| animation.duration_ms > 0);
        if timed {
            self.pending = Some(target);
        } else {
            self.pending = None;
            self.snap(target);
        }
    }

    fn snap(&mut self, target: T) {
        self.from = target.clone();
        self.to = target;
        self.completed = true;
    }

    /// Jump to the target and mark the transition completed.
    pub fn complete_transition(&mut self) {
        let target = self.pending.take().unwrap_or_else(|| self.to.clone());
        self.snap(target);
    }

    /// Attach, replace, or detach the animation.
    ///
    /// Detaching snaps to the target, since a property without an animation
    /// is always completed.
    pub fn set_animation(&mut self, animation: Option<Animation>) {
        if animation.is_none() {
            self.complete_transition();
        }
        self.animation = animation;
    }

    /// Latest target, including one that has not started yet.
    pub fn target(&self) -> &T {
        self.pending.as_ref().unwrap_or(&self.to)
    }

    pub fn origin(&self) -> &T {
        &self.from
    }

    pub fn start(&self) -> TimeMs {
        self.start
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.animation.as_ref()
    }

    /// Whether a retarget is waiting for its first frame.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_animated(&self) -> bool {
        self.animation.is_some()
    }

    /// Completion as last latched by [`get_value`](Self::get_value).
    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
