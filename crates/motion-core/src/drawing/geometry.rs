//! The geometry contract.
//!
//! A geometry composes an [`Animatable`] property table with a way to
//! measure and draw itself. Geometries are shared between the canvas and
//! the layout code that retargets them, so they live behind a mutex.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use motion_config::RenderConfig;

use super::context::{Brush, DrawingContext};
use crate::animation::{Animatable, Rect, Size, Transform2D};
use crate::error::Result;
use crate::time::TimeMs;

/// Unique identifier for a registered geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GeometryId(pub u64);

impl GeometryId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for GeometryId {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-draw inputs handed down by the canvas.
#[derive(Debug, Clone, Copy)]
pub struct DrawArgs<'a> {
    /// Frame time shared by every geometry in the pass.
    pub now: TimeMs,
    /// Paint of the owning task, resolved at `now`.
    pub paint: Brush,
    /// Transform of the enclosing geometry, if any.
    pub parent: Option<Transform2D>,
    pub config: &'a RenderConfig,
}

impl<'a> DrawArgs<'a> {
    pub fn new(now: TimeMs, paint: Brush, config: &'a RenderConfig) -> Self {
        Self {
            now,
            paint,
            parent: None,
            config,
        }
    }

    /// Same arguments with `parent` as the enclosing transform.
    pub fn with_parent(&self, parent: Transform2D) -> Self {
        Self {
            parent: Some(parent),
            ..*self
        }
    }

    /// Compose a local transform under the parent transform.
    pub fn resolve(&self, local: &Transform2D) -> Transform2D {
        match &self.parent {
            Some(parent) => parent.then(local),
            None => *local,
        }
    }
}

/// A drawable, animatable chart primitive.
pub trait Geometry: Send {
    fn animatable(&self) -> &Animatable;

    fn animatable_mut(&mut self) -> &mut Animatable;

    /// Size of the geometry at its current time.
    fn measure(&self) -> Size;

    /// Local bounds at the current time, before the parent transform.
    fn bounds(&self) -> Rect;

    /// Local transform at the current time.
    fn transform(&self) -> Transform2D {
        Transform2D::identity()
    }

    /// Submit the commands for this geometry.
    fn draw(&self, ctx: &mut dyn DrawingContext, args: &DrawArgs<'_>) -> Result<()>;

    /// Move to `now` and return validity.
    fn advance(&mut self, now: TimeMs) -> bool {
        self.animatable_mut().advance(now)
    }

    /// Jump every property to its target.
    fn complete_all(&mut self) {
        self.animatable_mut().complete_all();
    }

    fn is_valid(&self) -> bool {
        self.animatable().is_valid()
    }

    fn remove_on_completed(&self) -> bool {
        self.animatable().remove_on_completed()
    }
}

/// Type-erased geometry shared with a task.
pub type SharedGeometry = Arc<Mutex<dyn Geometry>>;

/// Typed geometry shared with a task.
pub type GeometryHandle<G> = Arc<Mutex<G>>;

/// Wrap a geometry so it can be registered and still mutated by its owner.
pub fn share<G: Geometry>(geometry: G) -> GeometryHandle<G> {
    Arc::new(Mutex::new(geometry))
}
