//! Value types carried by motion properties.
//!
//! - `Color`: linear premultiplied RGBA, converted from sRGB through `palette`
//! - `Point`, `Size`, `Rect`: chart-space geometry
//! - `MotionValue`: tagged union stored in an entity's property table

use palette::{FromColor, LinSrgba, Srgba};
use serde::{Deserialize, Serialize};

use super::transform::DecomposedTransform;

/// RGBA color in linear premultiplied space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Convenience alias for `from_srgba_u8`.
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_srgba_u8([r, g, b, a])
    }

    /// Create from sRGB u8 RGBA (premultiplied in linear space).
    pub fn from_srgba_u8(c: [u8; 4]) -> Self {
        let s = Srgba::new(
            c[0] as f32 / 255.0,
            c[1] as f32 / 255.0,
            c[2] as f32 / 255.0,
            c[3] as f32 / 255.0,
        );
        let lin: LinSrgba = LinSrgba::from_color(s);
        Self::from_lin_rgba(lin.red, lin.green, lin.blue, lin.alpha)
    }

    /// Create directly from linear RGBA floats and premultiply.
    #[inline]
    pub fn from_lin_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r * a,
            g: g * a,
            b: b * a,
            a,
        }
    }

    /// Convert back to sRGB u8 RGBA (unpremultiplied).
    pub fn to_srgba_u8(&self) -> [u8; 4] {
        let (r, g, b) = if self.a > 0.0001 {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        } else {
            (0.0, 0.0, 0.0)
        };

        let lin = LinSrgba::new(r, g, b, self.a);
        let srgb: Srgba = Srgba::from_color(lin);

        [
            (srgb.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in chart space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Enum representing every value type a motion property can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionValue {
    /// Numeric value (coordinates, lengths, opacity, thickness, ...)
    Scalar { value: f64 },
    Color { color: Color },
    Point { point: Point },
    Size { size: Size },
    /// Decomposed 2D transform (translate, scale, rotate, skew).
    Transform {
        #[serde(flatten)]
        transform: DecomposedTransform,
    },
}

impl MotionValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar { value } => Some(*value),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color { color } => Some(*color),
            _ => None,
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point { point } => Some(*point),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<Size> {
        match self {
            Self::Size { size } => Some(*size),
            _ => None,
        }
    }

    pub fn as_transform(&self) -> Option<DecomposedTransform> {
        match self {
            Self::Transform { transform } => Some(*transform),
            _ => None,
        }
    }
}

impl From<f64> for MotionValue {
    fn from(v: f64) -> Self {
        Self::Scalar { value: v }
    }
}

impl From<Color> for MotionValue {
    fn from(c: Color) -> Self {
        Self::Color { color: c }
    }
}

impl From<Point> for MotionValue {
    fn from(p: Point) -> Self {
        Self::Point { point: p }
    }
}

impl From<Size> for MotionValue {
    fn from(s: Size) -> Self {
        Self::Size { size: s }
    }
}

impl From<DecomposedTransform> for MotionValue {
    fn from(t: DecomposedTransform) -> Self {
        Self::Transform { transform: t }
    }
}
