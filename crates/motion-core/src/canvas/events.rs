//! Canvas notifications for host integration.
//!
//! A host learns that a redraw is needed through [`CanvasEvent::Invalidated`]
//! and that the scene has settled through [`CanvasEvent::Validated`]. Events
//! are both queued for polling and delivered to subscribed listeners.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// Notification raised by a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// A redraw was requested.
    Invalidated,
    /// A frame finished with nothing left to animate.
    Validated {
        /// Sequence number of the validating frame.
        frame: u64,
    },
}

/// FIFO of canvas events awaiting a poll.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<CanvasEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CanvasEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<CanvasEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = CanvasEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Callback invoked for every canvas event.
pub type CanvasListener = Box<dyn Fn(&CanvasEvent) + Send + Sync>;

/// Validity flag and notification channel of a canvas.
///
/// Shared through an `Arc` so layout code can invalidate the canvas from any
/// thread without touching the frame pass. Listeners run on the thread that
/// raised the event and must not subscribe further listeners.
pub struct CanvasSignal {
    valid: AtomicBool,
    events: Mutex<EventQueue>,
    listeners: RwLock<Vec<CanvasListener>>,
}

impl CanvasSignal {
    /// A signal in the invalid state, so the first frame is always drawn.
    pub fn new() -> Self {
        Self {
            valid: AtomicBool::new(false),
            events: Mutex::new(EventQueue::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Mark the canvas invalid and raise `Invalidated`.
    pub fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
        self.emit(CanvasEvent::Invalidated);
    }

    /// Record the outcome of a frame. Only a valid frame raises `Validated`.
    pub(crate) fn finish_frame(&self, frame: u64, valid: bool) {
        self.valid.store(valid, Ordering::Release);
        if valid {
            self.emit(CanvasEvent::Validated { frame });
        }
    }

    /// Mark the canvas invalid without notifying anyone.
    pub(crate) fn mark_invalid(&self) {
        self.valid.store(false, Ordering::Release);
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&CanvasEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    /// Take every queued event.
    pub fn drain(&self) -> Vec<CanvasEvent> {
        self.events.lock().drain().collect()
    }

    pub fn pending_events(&self) -> usize {
        self.events.lock().len()
    }

    fn emit(&self, event: CanvasEvent) {
        self.events.lock().push(event);
        for listener in self.listeners.read().iter() {
            listener(&event);
        }
    }
}

impl Default for CanvasSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CanvasSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasSignal")
            .field("valid", &self.is_valid())
            .field("pending_events", &self.pending_events())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}
