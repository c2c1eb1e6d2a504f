//! 2D transforms for geometry placement.
//!
//! `Transform2D` is the affine matrix handed to drawing backends and used to
//! compose a parent transform with a child's own. `DecomposedTransform` is
//! the animatable form: its components interpolate independently, with
//! rotation taking the shortest path.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::interpolate::Interpolate;

/// A 2D affine transformation matrix.
///
/// Stored as a 3x2 matrix (the bottom row [0, 0, 1] is implicit):
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0  1  |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self {
            tx,
            ty,
            ..Self::identity()
        }
    }

    /// Skew from radians.
    pub fn skew(skew_x: f64, skew_y: f64) -> Self {
        Self {
            b: skew_y.tan(),
            c: skew_x.tan(),
            ..Self::identity()
        }
    }

    /// Compose this transform with another (this * other).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn then(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }
}

/// Decomposed 2D transform components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Rotation in radians.
    pub rotate: f64,
    /// Horizontal skew in radians.
    pub skew_x: f64,
    /// Vertical skew in radians.
    pub skew_y: f64,
}

impl Default for DecomposedTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl DecomposedTransform {
    pub fn identity() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
        }
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::identity()
        }
    }

    /// Matrix form, composed as translate * rotate * scale * skew.
    pub fn to_matrix(&self) -> Transform2D {
        let cos = self.rotate.cos();
        let sin = self.rotate.sin();

        let result = Transform2D {
            a: cos * self.scale_x,
            b: sin * self.scale_x,
            c: -sin * self.scale_y,
            d: cos * self.scale_y,
            tx: self.translate_x,
            ty: self.translate_y,
        };

        if self.skew_x.abs() > f64::EPSILON || self.skew_y.abs() > f64::EPSILON {
            result.then(&Transform2D::skew(self.skew_x, self.skew_y))
        } else {
            result
        }
    }
}

impl Interpolate for DecomposedTransform {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            translate_x: self.translate_x + (to.translate_x - self.translate_x) * t,
            translate_y: self.translate_y + (to.translate_y - self.translate_y) * t,
            scale_x: self.scale_x + (to.scale_x - self.scale_x) * t,
            scale_y: self.scale_y + (to.scale_y - self.scale_y) * t,
            rotate: interpolate_angle(self.rotate, to.rotate, t),
            skew_x: self.skew_x + (to.skew_x - self.skew_x) * t,
            skew_y: self.skew_y + (to.skew_y - self.skew_y) * t,
        }
    }
}

/// Interpolate between two angles, taking the shortest path.
fn interpolate_angle(from: f64, to: f64, t: f64) -> f64 {
    let mut diff = to - from;

    while diff > PI {
        diff -= 2.0 * PI;
    }
    while diff < -PI {
        diff += 2.0 * PI;
    }

    from + diff * t
}
