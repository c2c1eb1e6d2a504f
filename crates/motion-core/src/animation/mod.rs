//! Animation module for chart geometries.
//!
//! This module provides:
//! - **Easing Functions**: CSS timing functions plus chart curves
//! - **Animation Descriptors**: easing, cycle duration, and repeat count
//! - **Motion Properties**: per-value interpolation state
//! - **Animatable Entities**: named property tables with one validity flag
//!
//! # Architecture
//!
//! ```text
//! Animatable (one per geometry, slots from a static PropertySchema)
//!   └── MotionProperty<MotionValue> per slot
//!         └── Animation (easing, duration, repeat)
//! ```

pub mod animatable;
pub mod descriptor;
pub mod easing;
pub mod interpolate;
pub mod property;
pub mod transform;
pub mod value;

pub use animatable::{Animatable, AnimatableState, PropertySchema, TransitionTarget};
pub use descriptor::{Animation, AnimationSample, Repeat};
pub use easing::{EasingFunction, StepPosition};
pub use interpolate::Interpolate;
pub use property::MotionProperty;
pub use transform::{DecomposedTransform, Transform2D};
pub use value::{Color, MotionValue, Point, Rect, Size};
