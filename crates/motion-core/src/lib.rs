//! Motion engine for animated chart primitives.
//!
//! Geometries own named motion properties that interpolate towards their
//! targets over time. A [`MotionCanvas`] drives every geometry with one
//! shared frame time, folds their completion into a single validity flag,
//! and evicts settled geometries that asked to be removed.
//!
//! ```text
//! layout pass ── set_value ──▶ Animatable ──▶ canvas.invalidate()
//!                                                   │
//! host ◀── Invalidated ─────────────────────────────┘
//! host ── draw_frame ──▶ MotionCanvas ──▶ DrawingContext
//!                              └── Validated once nothing is left to animate
//! ```

pub mod animation;
pub mod canvas;
pub mod driver;
pub mod drawing;
pub mod error;
pub mod throttle;
pub mod time;

pub use animation::{
    Animatable, AnimatableState, Animation, Color, DecomposedTransform, EasingFunction,
    Interpolate, MotionProperty, MotionValue, Point, PropertySchema, Rect, Repeat, Size,
    Transform2D, TransitionTarget,
};
pub use canvas::{CanvasEvent, CanvasSignal, FrameReport, MotionCanvas};
pub use driver::{RenderLoop, SharedCanvas};
pub use drawing::{
    Brush, CircleGeometry, ContainerGeometry, DrawArgs, DrawCommand, DrawableTask, DrawingContext,
    Geometry, GeometryHandle, GeometryId, LabelGeometry, LineGeometry, Paint, PaintStyle,
    RecordingContext, RectangleGeometry, SharedGeometry, TaskId, share,
};
pub use error::{MotionError, Result};
pub use motion_config::{MotionConfig, RenderConfig, ThrottleConfig};
pub use throttle::ActionThrottler;
pub use time::{Clock, ManualClock, MonotonicClock, TimeMs};
