//! Built-in chart shapes.
//!
//! Every shape composes an [`Animatable`] and declares the properties it
//! owns in a static schema. Slot constants on each shape index that schema.

use super::context::{Brush, DrawCommand, DrawingContext};
use super::geometry::{DrawArgs, Geometry, SharedGeometry};
use crate::animation::{
    Animatable, Animation, DecomposedTransform, Point, PropertySchema, Rect, Size, Transform2D,
};
use crate::error::{MotionError, Result};
use crate::time::TimeMs;

/// Scale a premultiplied brush color by `opacity`.
fn faded(mut brush: Brush, opacity: f64) -> Brush {
    let k = opacity.clamp(0.0, 1.0) as f32;
    brush.color.r *= k;
    brush.color.g *= k;
    brush.color.b *= k;
    brush.color.a *= k;
    brush
}

static RECTANGLE_SCHEMA: PropertySchema = PropertySchema::new(
    "RectangleGeometry",
    &["X", "Y", "Width", "Height", "Opacity", "Transform"],
);

/// Axis-aligned bar or box.
#[derive(Debug, Clone)]
pub struct RectangleGeometry {
    animatable: Animatable,
}

impl RectangleGeometry {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const WIDTH: usize = 2;
    pub const HEIGHT: usize = 3;
    pub const OPACITY: usize = 4;
    pub const TRANSFORM: usize = 5;

    pub fn new(rect: Rect) -> Self {
        Self {
            animatable: Animatable::new(
                &RECTANGLE_SCHEMA,
                vec![
                    rect.x.into(),
                    rect.y.into(),
                    rect.width.into(),
                    rect.height.into(),
                    1.0.into(),
                    DecomposedTransform::identity().into(),
                ],
            ),
        }
    }

    pub fn schema() -> &'static PropertySchema {
        &RECTANGLE_SCHEMA
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animatable.set_transition_all(animation);
        self
    }

    pub fn rect(&self) -> Rect {
        let a = &self.animatable;
        Rect::new(
            a.scalar(Self::X),
            a.scalar(Self::Y),
            a.scalar(Self::WIDTH),
            a.scalar(Self::HEIGHT),
        )
    }

    /// Retarget position and size.
    pub fn set_rect(&mut self, rect: Rect) {
        self.animatable.set_value(Self::X, rect.x);
        self.animatable.set_value(Self::Y, rect.y);
        self.animatable.set_value(Self::WIDTH, rect.width);
        self.animatable.set_value(Self::HEIGHT, rect.height);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.animatable.set_value(Self::OPACITY, opacity);
    }

    pub fn set_transform(&mut self, transform: DecomposedTransform) {
        self.animatable.set_value(Self::TRANSFORM, transform);
    }
}

impl Geometry for RectangleGeometry {
    fn animatable(&self) -> &Animatable {
        &self.animatable
    }

    fn animatable_mut(&mut self) -> &mut Animatable {
        &mut self.animatable
    }

    fn measure(&self) -> Size {
        self.rect().size()
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }

    fn transform(&self) -> Transform2D {
        self.animatable.transform(Self::TRANSFORM).to_matrix()
    }

    fn draw(&self, ctx: &mut dyn DrawingContext, args: &DrawArgs<'_>) -> Result<()> {
        ctx.submit(DrawCommand::Rect {
            rect: self.rect(),
            brush: faded(args.paint, self.animatable.scalar(Self::OPACITY)),
            transform: args.resolve(&self.transform()),
        })
    }
}

static CIRCLE_SCHEMA: PropertySchema = PropertySchema::new(
    "CircleGeometry",
    &["CenterX", "CenterY", "Radius", "Opacity", "Transform"],
);

/// Scatter point or marker.
#[derive(Debug, Clone)]
pub struct CircleGeometry {
    animatable: Animatable,
}

impl CircleGeometry {
    pub const CENTER_X: usize = 0;
    pub const CENTER_Y: usize = 1;
    pub const RADIUS: usize = 2;
    pub const OPACITY: usize = 3;
    pub const TRANSFORM: usize = 4;

    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            animatable: Animatable::new(
                &CIRCLE_SCHEMA,
                vec![
                    center.x.into(),
                    center.y.into(),
                    radius.into(),
                    1.0.into(),
                    DecomposedTransform::identity().into(),
                ],
            ),
        }
    }

    pub fn schema() -> &'static PropertySchema {
        &CIRCLE_SCHEMA
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animatable.set_transition_all(animation);
        self
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.animatable.scalar(Self::CENTER_X),
            self.animatable.scalar(Self::CENTER_Y),
        )
    }

    pub fn radius(&self) -> f64 {
        self.animatable.scalar(Self::RADIUS)
    }

    pub fn set_center(&mut self, center: Point) {
        self.animatable.set_value(Self::CENTER_X, center.x);
        self.animatable.set_value(Self::CENTER_Y, center.y);
    }

    pub fn set_radius(&mut self, radius: f64) {
        self.animatable.set_value(Self::RADIUS, radius);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.animatable.set_value(Self::OPACITY, opacity);
    }
}

impl Geometry for CircleGeometry {
    fn animatable(&self) -> &Animatable {
        &self.animatable
    }

    fn animatable_mut(&mut self) -> &mut Animatable {
        &mut self.animatable
    }

    fn measure(&self) -> Size {
        let d = self.radius() * 2.0;
        Size::new(d, d)
    }

    fn bounds(&self) -> Rect {
        let c = self.center();
        let r = self.radius();
        Rect::new(c.x - r, c.y - r, r * 2.0, r * 2.0)
    }

    fn transform(&self) -> Transform2D {
        self.animatable.transform(Self::TRANSFORM).to_matrix()
    }

    fn draw(&self, ctx: &mut dyn DrawingContext, args: &DrawArgs<'_>) -> Result<()> {
        let r = self.radius();
        ctx.submit(DrawCommand::Ellipse {
            center: self.center(),
            radii: Size::new(r, r),
            brush: faded(args.paint, self.animatable.scalar(Self::OPACITY)),
            transform: args.resolve(&self.transform()),
        })
    }
}

static LINE_SCHEMA: PropertySchema =
    PropertySchema::new("LineGeometry", &["X1", "Y1", "X2", "Y2", "Opacity"]);

/// Straight segment: grid lines, ticks, and line series segments.
#[derive(Debug, Clone)]
pub struct LineGeometry {
    animatable: Animatable,
}

impl LineGeometry {
    pub const X1: usize = 0;
    pub const Y1: usize = 1;
    pub const X2: usize = 2;
    pub const Y2: usize = 3;
    pub const OPACITY: usize = 4;

    pub fn new(from: Point, to: Point) -> Self {
        Self {
            animatable: Animatable::new(
                &LINE_SCHEMA,
                vec![from.x.into(), from.y.into(), to.x.into(), to.y.into(), 1.0.into()],
            ),
        }
    }

    pub fn schema() -> &'static PropertySchema {
        &LINE_SCHEMA
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animatable.set_transition_all(animation);
        self
    }

    pub fn endpoints(&self) -> (Point, Point) {
        let a = &self.animatable;
        (
            Point::new(a.scalar(Self::X1), a.scalar(Self::Y1)),
            Point::new(a.scalar(Self::X2), a.scalar(Self::Y2)),
        )
    }

    pub fn set_endpoints(&mut self, from: Point, to: Point) {
        self.animatable.set_value(Self::X1, from.x);
        self.animatable.set_value(Self::Y1, from.y);
        self.animatable.set_value(Self::X2, to.x);
        self.animatable.set_value(Self::Y2, to.y);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.animatable.set_value(Self::OPACITY, opacity);
    }
}

impl Geometry for LineGeometry {
    fn animatable(&self) -> &Animatable {
        &self.animatable
    }

    fn animatable_mut(&mut self) -> &mut Animatable {
        &mut self.animatable
    }

    fn measure(&self) -> Size {
        self.bounds().size()
    }

    fn bounds(&self) -> Rect {
        let (from, to) = self.endpoints();
        let x = from.x.min(to.x);
        let y = from.y.min(to.y);
        Rect::new(x, y, (from.x - to.x).abs(), (from.y - to.y).abs())
    }

    fn draw(&self, ctx: &mut dyn DrawingContext, args: &DrawArgs<'_>) -> Result<()> {
        let (from, to) = self.endpoints();
        ctx.submit(DrawCommand::Line {
            from,
            to,
            brush: faded(args.paint, self.animatable.scalar(Self::OPACITY)),
            transform: args.resolve(&Transform2D::identity()),
        })
    }
}

static LABEL_SCHEMA: PropertySchema = PropertySchema::new(
    "LabelGeometry",
    &["X", "Y", "FontSize", "Opacity", "Transform"],
);

/// Average glyph advance relative to the font size, used until a text
/// backend measures the run.
const GLYPH_ADVANCE: f64 = 0.6;

/// Axis label or data label.
#[derive(Debug, Clone)]
pub struct LabelGeometry {
    animatable: Animatable,
    text: String,
}

impl LabelGeometry {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const FONT_SIZE: usize = 2;
    pub const OPACITY: usize = 3;
    pub const TRANSFORM: usize = 4;

    pub fn new(text: impl Into<String>, origin: Point, font_size: f64) -> Self {
        Self {
            animatable: Animatable::new(
                &LABEL_SCHEMA,
                vec![
                    origin.x.into(),
                    origin.y.into(),
                    font_size.into(),
                    1.0.into(),
                    DecomposedTransform::identity().into(),
                ],
            ),
            text: text.into(),
        }
    }

    pub fn schema() -> &'static PropertySchema {
        &LABEL_SCHEMA
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animatable.set_transition_all(animation);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text changes apply immediately.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn origin(&self) -> Point {
        Point::new(
            self.animatable.scalar(Self::X),
            self.animatable.scalar(Self::Y),
        )
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.animatable.set_value(Self::X, origin.x);
        self.animatable.set_value(Self::Y, origin.y);
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        self.animatable.set_value(Self::FONT_SIZE, font_size);
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.animatable.set_value(Self::OPACITY, opacity);
    }
}

impl Geometry for LabelGeometry {
    fn animatable(&self) -> &Animatable {
        &self.animatable
    }

    fn animatable_mut(&mut self) -> &mut Animatable {
        &mut self.animatable
    }

    fn measure(&self) -> Size {
        let font_size = self.animatable.scalar(Self::FONT_SIZE);
        let glyphs = self.text.chars().count() as f64;
        Size::new(glyphs * font_size * GLYPH_ADVANCE, font_size)
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.measure())
    }

    fn transform(&self) -> Transform2D {
        self.animatable.transform(Self::TRANSFORM).to_matrix()
    }

    fn draw(&self, ctx: &mut dyn DrawingContext, args: &DrawArgs<'_>) -> Result<()> {
        ctx.submit(DrawCommand::Text {
            text: self.text.clone(),
            origin: self.origin(),
            font_size: self.animatable.scalar(Self::FONT_SIZE),
            brush: faded(args.paint, self.animatable.scalar(Self::OPACITY)),
            transform: args.resolve(&self.transform()),
        })
    }
}

static CONTAINER_SCHEMA: PropertySchema =
    PropertySchema::new("ContainerGeometry", &["X", "Y", "Transform"]);

/// Places external content (legend entries, tooltips) at an animated offset.
///
/// The content is drawn with the container's transform as its parent.
pub struct ContainerGeometry {
    animatable: Animatable,
    content: Option<SharedGeometry>,
}

impl ContainerGeometry {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const TRANSFORM: usize = 2;

    pub fn new(origin: Point) -> Self {
        Self {
            animatable: Animatable::new(
                &CONTAINER_SCHEMA,
                vec![
                    origin.x.into(),
                    origin.y.into(),
                    DecomposedTransform::identity().into(),
                ],
            ),
            content: None,
        }
    }

    pub fn schema() -> &'static PropertySchema {
        &CONTAINER_SCHEMA
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animatable.set_transition_all(animation);
        self
    }

    pub fn with_content(mut self, content: SharedGeometry) -> Self {
        self.content = Some(content);
        self
    }

    pub fn set_content(&mut self, content: Option<SharedGeometry>) {
        self.content = content;
    }

    pub fn content(&self) -> Option<&SharedGeometry> {
        self.content.as_ref()
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.animatable.set_value(Self::X, origin.x);
        self.animatable.set_value(Self::Y, origin.y);
    }

    pub fn origin(&self) -> Point {
        Point::new(
            self.animatable.scalar(Self::X),
            self.animatable.scalar(Self::Y),
        )
    }
}

impl Geometry for ContainerGeometry {
    fn animatable(&self) -> &Animatable {
        &self.animatable
    }

    fn animatable_mut(&mut self) -> &mut Animatable {
        &mut self.animatable
    }

    fn measure(&self) -> Size {
        self.content
            .as_ref()
            .map(|content| content.lock().measure())
            .unwrap_or_default()
    }

    fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.origin(), self.measure())
    }

    fn transform(&self) -> Transform2D {
        let origin = self.origin();
        Transform2D::translate(origin.x, origin.y)
            .then(&self.animatable.transform(Self::TRANSFORM).to_matrix())
    }

    fn draw(&self, ctx: &mut dyn DrawingContext, args: &DrawArgs<'_>) -> Result<()> {
        let content = self.content.as_ref().ok_or(MotionError::MissingContent {
            container: CONTAINER_SCHEMA.entity,
        })?;
        let parent = args.resolve(&self.transform());
        content.lock().draw(ctx, &args.with_parent(parent))
    }

    fn advance(&mut self, now: TimeMs) -> bool {
        let own = self.animatable.advance(now);
        let content = self
            .content
            .as_ref()
            .is_none_or(|content| content.lock().advance(now));
        own && content
    }

    fn complete_all(&mut self) {
        self.animatable.complete_all();
        if let Some(content) = &self.content {
            content.lock().complete_all();
        }
    }

    fn is_valid(&self) -> bool {
        self.animatable.is_valid()
            && self
                .content
                .as_ref()
                .is_none_or(|content| content.lock().is_valid())
    }
}
