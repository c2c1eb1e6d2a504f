//! Drawable tasks: geometries grouped under one paint and z-order.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use super::context::{Brush, PaintStyle};
use super::geometry::{Geometry, GeometryHandle, GeometryId, SharedGeometry};
use crate::animation::{Animatable, Animation, Color, PropertySchema};
use crate::time::TimeMs;

/// Unique identifier for a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl TaskId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

static PAINT_SCHEMA: PropertySchema = PropertySchema::new("Paint", &["Color", "StrokeThickness"]);

/// Animatable paint shared by the geometries of a task.
#[derive(Debug, Clone)]
pub struct Paint {
    animatable: Animatable,
    style: PaintStyle,
}

impl Paint {
    pub const COLOR: usize = 0;
    pub const STROKE_THICKNESS: usize = 1;

    pub fn new(color: Color, stroke_thickness: f64, style: PaintStyle) -> Self {
        Self {
            animatable: Animatable::new(
                &PAINT_SCHEMA,
                vec![color.into(), stroke_thickness.into()],
            ),
            style,
        }
    }

    pub fn fill(color: Color) -> Self {
        Self::new(color, 0.0, PaintStyle::Fill)
    }

    pub fn stroke(color: Color, thickness: f64) -> Self {
        Self::new(color, thickness, PaintStyle::Stroke)
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animatable.set_transition_all(animation);
        self
    }

    pub fn style(&self) -> PaintStyle {
        self.style
    }

    pub fn set_color(&mut self, color: Color) {
        self.animatable.set_value(Self::COLOR, color);
    }

    pub fn set_stroke_thickness(&mut self, thickness: f64) {
        self.animatable.set_value(Self::STROKE_THICKNESS, thickness);
    }

    /// Brush at the paint's current time.
    pub fn brush(&self) -> Brush {
        Brush {
            color: self.animatable.color(Self::COLOR),
            stroke_thickness: self.animatable.scalar(Self::STROKE_THICKNESS),
            style: self.style,
        }
    }

    pub fn animatable(&self) -> &Animatable {
        &self.animatable
    }

    pub fn animatable_mut(&mut self) -> &mut Animatable {
        &mut self.animatable
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::fill(Color::BLACK)
    }
}

/// Geometries drawn with one paint at one z-index.
pub struct DrawableTask {
    id: TaskId,
    paint: Paint,
    z_index: i32,
    paused: bool,
    geometries: Vec<(GeometryId, SharedGeometry)>,
}

impl DrawableTask {
    pub fn new(paint: Paint) -> Self {
        Self {
            id: TaskId::new(),
            paint,
            z_index: 0,
            paused: false,
            geometries: Vec::new(),
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn paint(&self) -> &Paint {
        &self.paint
    }

    pub fn paint_mut(&mut self) -> &mut Paint {
        &mut self.paint
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Paused tasks keep their geometries but skip them during frame passes.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn remove_on_completed(&self) -> bool {
        self.paint.animatable().remove_on_completed()
    }

    /// Request eviction of the whole task once its paint settles.
    pub fn set_remove_on_completed(&mut self, remove: bool) {
        self.paint.animatable_mut().set_remove_on_completed(remove);
    }

    pub fn current_time(&self) -> TimeMs {
        self.paint.animatable().current_time()
    }

    /// Register a geometry. The caller keeps the typed handle to retarget it.
    pub fn add_geometry<G: Geometry + 'static>(&mut self, geometry: GeometryHandle<G>) -> GeometryId {
        self.add_shared(geometry)
    }

    pub fn add_shared(&mut self, geometry: SharedGeometry) -> GeometryId {
        let id = GeometryId::new();
        self.geometries.push((id, geometry));
        id
    }

    pub fn remove_geometry(&mut self, id: GeometryId) -> Option<SharedGeometry> {
        let index = self.geometries.iter().position(|(gid, _)| *gid == id)?;
        Some(self.geometries.remove(index).1)
    }

    pub fn contains(&self, id: GeometryId) -> bool {
        self.geometries.iter().any(|(gid, _)| *gid == id)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&SharedGeometry> {
        self.geometries
            .iter()
            .find(|(gid, _)| *gid == id)
            .map(|(_, geometry)| geometry)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Geometries in registration order.
    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &SharedGeometry)> {
        self.geometries.iter().map(|(id, geometry)| (*id, geometry))
    }

    /// Move the paint to `now` and return its validity.
    pub fn advance(&mut self, now: TimeMs) -> bool {
        self.paint.animatable_mut().advance(now)
    }

    /// Jump the paint and every geometry to their targets.
    pub fn complete_transition(&mut self) {
        self.paint.animatable_mut().complete_all();
        for (_, geometry) in &self.geometries {
            geometry.lock().complete_all();
        }
    }
}

impl std::fmt::Debug for DrawableTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawableTask")
            .field("id", &self.id)
            .field("z_index", &self.z_index)
            .field("paused", &self.paused)
            .field("geometries", &self.geometries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{EasingFunction, Point, Rect};
    use crate::drawing::geometry::share;
    use crate::drawing::shapes::{CircleGeometry, RectangleGeometry};

    #[test]
    fn test_add_and_remove_geometries() {
        let mut task = DrawableTask::new(Paint::default());
        let a = task.add_geometry(share(RectangleGeometry::new(Rect::default())));
        let b = task.add_geometry(share(CircleGeometry::new(Point::ORIGIN, 2.0)));
        assert_eq!(task.geometry_count(), 2);
        assert!(task.contains(a));

        assert!(task.remove_geometry(a).is_some());
        assert!(!task.contains(a));
        assert!(task.remove_geometry(a).is_none());

        let ids: Vec<_> = task.geometries().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![b]);
    }

    #[test]
    fn test_paint_animates_color() {
        let mut paint =
            Paint::fill(Color::BLACK).with_animation(Animation::new(EasingFunction::Linear, 100));
        paint.set_color(Color::WHITE);
        assert!(!paint.animatable_mut().advance(0));
        assert!(!paint.animatable_mut().advance(50));
        assert_eq!(paint.brush().color.r, 0.5);
        assert_eq!(paint.brush().style, PaintStyle::Fill);
    }

    #[test]
    fn test_complete_transition_settles_geometries() {
        let rect = share(
            RectangleGeometry::new(Rect::default())
                .with_animation(Animation::new(EasingFunction::Linear, 1000)),
        );
        rect.lock().set_rect(Rect::new(0.0, 0.0, 10.0, 10.0));

        let mut task = DrawableTask::new(Paint::default());
        task.add_geometry(rect.clone());
        assert!(!rect.lock().is_valid());

        task.complete_transition();
        assert!(rect.lock().is_valid());
        assert_eq!(rect.lock().rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_pause_and_z_index() {
        let mut task = DrawableTask::new(Paint::default()).with_z_index(3);
        assert_eq!(task.z_index(), 3);
        task.set_z_index(-1);
        assert_eq!(task.z_index(), -1);
        task.set_paused(true);
        assert!(task.is_paused());
    }
}
