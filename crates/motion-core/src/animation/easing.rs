//! Easing functions for animation timing.
//!
//! This module implements the CSS timing functions plus the curves charts
//! commonly use for entering series:
//! - Linear
//! - Ease, EaseIn, EaseOut, EaseInOut (standard CSS curves)
//! - CubicBezier (custom bezier curves)
//! - Steps (stepped animations)
//! - Quad/Cubic/Sin polynomial curves, BackOut, BounceOut, ElasticOut
//! - Custom (any `fn(f64) -> f64`)
//!
//! # Usage
//!
//! ```
//! use motion_core::animation::easing::{EasingFunction, StepPosition};
//!
//! let ease = EasingFunction::Ease;
//! let progress = ease.evaluate(0.5); // Get eased progress at 50%
//!
//! let custom = EasingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0);
//! let progress = custom.evaluate(0.5);
//!
//! let parsed: EasingFunction = "bounce_out".parse().unwrap();
//! assert_eq!(parsed, EasingFunction::BounceOut);
//! ```

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Position for stepped animations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval (CSS `jump-start` / `start`).
    Start,
    /// Jump at the end of each interval (CSS `jump-end` / `end`).
    #[default]
    End,
    /// Jump at both start and end (CSS `jump-both`).
    Both,
    /// No jump at start or end (CSS `jump-none`).
    None,
}

/// Easing function for animation timing.
///
/// Easing functions map a linear progress value (0.0 to 1.0) to an eased
/// output value, controlling the rate of change over time. Every built-in
/// curve maps 0 to 0 and 1 to 1; some overshoot in between.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// CSS `ease` - Slow start, fast middle, slow end.
    /// Equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    #[default]
    Ease,

    /// CSS `ease-in` - Slow start, accelerating.
    EaseIn,

    /// CSS `ease-out` - Fast start, decelerating.
    EaseOut,

    /// CSS `ease-in-out` - Slow start and end, fast middle.
    EaseInOut,

    /// Custom cubic bezier curve.
    /// x values must be in [0, 1], y values can be any float.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// Stepped animation with discrete jumps.
    Steps { count: u32, position: StepPosition },

    /// `t²`
    QuadIn,
    /// `1 - (1 - t)²`
    QuadOut,
    /// `1 - (1 - t)³`
    CubicOut,
    /// Half cosine wave, symmetric around the midpoint.
    SinInOut,
    /// Overshoots the target slightly before settling.
    BackOut,
    /// Bounces against the target like a dropped ball.
    BounceOut,
    /// Oscillates around the target with decaying amplitude.
    ElasticOut,

    /// Caller-provided curve. Not serializable.
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl EasingFunction {
    /// Evaluate the easing function at the given progress.
    ///
    /// `t` is clamped to [0, 1] before evaluation.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::SinInOut => -((PI * t).cos() - 1.0) / 2.0,
            Self::BackOut => back_out(t),
            Self::BounceOut => bounce_out(t),
            Self::ElasticOut => elastic_out(t),
            Self::Custom(f) => f(t),
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Create a stepped easing function.
    ///
    /// # Panics
    /// Panics if steps is 0.
    pub fn steps(steps: u32, position: StepPosition) -> Self {
        assert!(steps >= 1, "Steps must be at least 1");
        Self::Steps {
            count: steps,
            position,
        }
    }
}

impl FromStr for EasingFunction {
    type Err = MotionError;

    /// Parse a snake_case (or kebab-case) easing name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        let easing = match name.as_str() {
            "linear" => Self::Linear,
            "ease" => Self::Ease,
            "ease_in" => Self::EaseIn,
            "ease_out" => Self::EaseOut,
            "ease_in_out" => Self::EaseInOut,
            "quad_in" => Self::QuadIn,
            "quad_out" => Self::QuadOut,
            "cubic_out" => Self::CubicOut,
            "sin_in_out" => Self::SinInOut,
            "back_out" => Self::BackOut,
            "bounce_out" => Self::BounceOut,
            "elastic_out" => Self::ElasticOut,
            _ => return Err(MotionError::UnknownEasing(s.to_string())),
        };
        Ok(easing)
    }
}

/// Evaluate a cubic bezier curve at time t.
///
/// Uses Newton-Raphson iteration to find the curve parameter for the input
/// progress, then evaluates the y coordinate at that parameter.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_y(y1, y2, t)
}

/// Solve for t in the bezier x equation using Newton-Raphson iteration.
fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_x(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// x(t) = 3(1-t)²t·x1 + 3(1-t)t²·x2 + t³
#[inline]
fn bezier_x(x1: f64, x2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

#[inline]
fn bezier_y(y1: f64, y2: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;

    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f64) -> f64 {
    if steps == 0 {
        return t;
    }

    let steps_f = steps as f64;

    match position {
        StepPosition::Start => (t * steps_f).ceil() / steps_f,
        StepPosition::End => (t * steps_f).floor() / steps_f,
        StepPosition::Both => {
            let total_steps = steps_f + 1.0;
            ((t * total_steps).floor() / steps_f).min(1.0)
        }
        StepPosition::None => {
            if steps == 1 {
                // With 1 step and jump-none the output stays at 0.5
                0.5
            } else {
                let effective_steps = steps_f - 1.0;
                ((t * steps_f).floor() / effective_steps).min(1.0)
            }
        }
    }
}

fn back_out(t: f64) -> f64 {
    const C1: f64 = 1.70158;
    const C3: f64 = C1 + 1.0;
    let u = t - 1.0;
    1.0 + C3 * u * u * u + C1 * u * u
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

fn elastic_out(t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let c4 = (2.0 * PI) / 3.0;
    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_linear() {
        let ease = EasingFunction::Linear;
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_ease_boundaries() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));

        // CSS ease starts slowly, then accelerates quickly
        let mid = ease.evaluate(0.5);
        assert!(mid > 0.7 && mid < 0.9, "CSS ease mid-point should be ~0.8, got {}", mid);

        let early = ease.evaluate(0.25);
        let late = ease.evaluate(0.75);
        assert!(early < mid);
        assert!(mid < late);
    }

    #[test]
    fn test_ease_in_out_symmetry() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));

        let sin = EasingFunction::SinInOut;
        assert!(approx_eq(sin.evaluate(0.5), 0.5));
        assert!(approx_eq(sin.evaluate(0.2) + sin.evaluate(0.8), 1.0));
    }

    #[test]
    fn test_ease_in_and_out_shapes() {
        assert!(EasingFunction::EaseIn.evaluate(0.25) < 0.25);
        assert!(EasingFunction::EaseOut.evaluate(0.25) > 0.25);
        assert!(approx_eq(EasingFunction::QuadIn.evaluate(0.5), 0.25));
        assert!(approx_eq(EasingFunction::QuadOut.evaluate(0.5), 0.75));
        assert!(approx_eq(EasingFunction::CubicOut.evaluate(0.5), 0.875));
    }

    #[test]
    fn test_chart_curves_hit_endpoints() {
        for ease in [
            EasingFunction::BackOut,
            EasingFunction::BounceOut,
            EasingFunction::ElasticOut,
            EasingFunction::SinInOut,
            EasingFunction::QuadIn,
            EasingFunction::QuadOut,
            EasingFunction::CubicOut,
        ] {
            assert!(approx_eq(ease.evaluate(0.0), 0.0), "{:?} at 0", ease);
            assert!(approx_eq(ease.evaluate(1.0), 1.0), "{:?} at 1", ease);
        }
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| EasingFunction::BackOut.evaluate(i as f64 / 100.0))
            .fold(0.0f64, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_custom_bezier() {
        let ease = EasingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0);
        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));

        let linear_bezier = EasingFunction::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        assert!(approx_eq(linear_bezier.evaluate(0.5), 0.5));
    }

    #[test]
    fn test_custom_function() {
        fn half(t: f64) -> f64 {
            t / 2.0
        }
        let ease = EasingFunction::Custom(half);
        assert!(approx_eq(ease.evaluate(1.0), 0.5));
        // Input is still clamped
        assert!(approx_eq(ease.evaluate(3.0), 0.5));
    }

    #[test]
    fn test_steps_end() {
        let ease = EasingFunction::steps(4, StepPosition::End);

        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.24), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(0.74), 0.5));
        assert!(approx_eq(ease.evaluate(0.99), 0.75));
        assert!(approx_eq(ease.evaluate(1.0), 1.0));
    }

    #[test]
    fn test_steps_start() {
        let ease = EasingFunction::steps(4, StepPosition::Start);

        assert!(approx_eq(ease.evaluate(0.0), 0.0));
        assert!(approx_eq(ease.evaluate(0.01), 0.25));
        assert!(approx_eq(ease.evaluate(0.26), 0.5));
        assert!(approx_eq(ease.evaluate(0.76), 1.0));
    }

    #[test]
    fn test_clamping() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("linear".parse::<EasingFunction>().unwrap(), EasingFunction::Linear);
        assert_eq!("ease-in-out".parse::<EasingFunction>().unwrap(), EasingFunction::EaseInOut);
        assert_eq!(" Elastic_Out ".parse::<EasingFunction>().unwrap(), EasingFunction::ElasticOut);

        let err = "wobble".parse::<EasingFunction>().unwrap_err();
        assert_eq!(err, MotionError::UnknownEasing("wobble".to_string()));
    }

    #[test]
    fn test_default() {
        assert_eq!(EasingFunction::default(), EasingFunction::Ease);
        assert_eq!(StepPosition::default(), StepPosition::End);
    }

    #[test]
    #[should_panic(expected = "Bezier x values must be in [0, 1]")]
    fn test_invalid_bezier_x1() {
        EasingFunction::cubic_bezier(-0.1, 0.0, 0.5, 1.0);
    }

    #[test]
    #[should_panic(expected = "Steps must be at least 1")]
    fn test_invalid_steps() {
        EasingFunction::steps(0, StepPosition::End);
    }
}
