//! Time sources for the frame loop.
//!
//! All motion math runs on integer milliseconds. A canvas samples its clock
//! once per frame and hands the same value to every task and geometry.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Instant;

/// Timestamp in milliseconds on a monotonic timeline.
pub type TimeMs = i64;

/// A monotonic time source.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds. Never decreases between calls.
    fn now_ms(&self) -> TimeMs;
}

/// Wall clock backed by [`Instant`], with its origin at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> TimeMs {
        self.origin.elapsed().as_millis() as TimeMs
    }
}

/// Clock driven explicitly by its owner.
///
/// Hosts that own their timeline (offline rendering, snapshot tests) advance
/// it themselves; moving it backwards is ignored to keep it monotonic.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: TimeMs) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    /// Move the clock to `time` if it is not earlier than the current time.
    pub fn set(&self, time: TimeMs) {
        self.now.fetch_max(time, Ordering::AcqRel);
    }

    /// Advance the clock by `delta_ms` and return the new time.
    pub fn advance(&self, delta_ms: u64) -> TimeMs {
        self.now.fetch_add(delta_ms as TimeMs, Ordering::AcqRel) + delta_ms as TimeMs
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimeMs {
        self.now.load(Ordering::Acquire)
    }
}
