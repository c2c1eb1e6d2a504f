//! Frame loop and invalidation protocol.

pub mod events;
pub mod motion_canvas;

pub use events::{CanvasEvent, CanvasListener, CanvasSignal, EventQueue};
pub use motion_canvas::{FrameReport, MotionCanvas};
