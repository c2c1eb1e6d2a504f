//! Drawing contract between geometries, tasks, and a rendering backend.

pub mod context;
pub mod geometry;
pub mod shapes;
pub mod task;

pub use context::{Brush, DrawCommand, DrawingContext, PaintStyle, RecordingContext};
pub use geometry::{DrawArgs, Geometry, GeometryHandle, GeometryId, SharedGeometry, share};
pub use shapes::{CircleGeometry, ContainerGeometry, LabelGeometry, LineGeometry, RectangleGeometry};
pub use task::{DrawableTask, Paint, TaskId};
