//! Easing functions for keyframe tweening.
//!
//! This module implements CSS-compatible timing functions:
//! - Linear
//! - Ease, EaseIn, EaseOut, EaseInOut (standard CSS curves)
//! - CubicBezier (custom bezier curves)
//! - Steps (stepped animations)
//!
//! and the named tween families (`back`, `bounce`, `elastic`, ...) with an
//! `in`, `out` or `in-out` direction.
//!
//! # Usage
//!
//! ```
//! use rune_animation::easing::{EasingFunction, TweenCurve, TweenDirection};
//!
//! let ease = EasingFunction::Ease;
//! let progress = ease.evaluate(0.5);
//!
//! let bounce = EasingFunction::tween(TweenCurve::Bounce, TweenDirection::Out);
//! let progress = bounce.evaluate(0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

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

/// Shape of a named tween curve, expressed in its `in` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenCurve {
    Back,
    Bounce,
    Circular,
    Cubic,
    Elastic,
    Exponential,
    Linear,
    Quadratic,
    Quartic,
    Quintic,
    Sine,
}

/// Which end(s) of the curve the easing is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TweenDirection {
    #[default]
    In,
    Out,
    InOut,
}

/// Easing function applied to the blend factor between two keys.
///
/// Maps linear progress in `[0, 1]` to eased progress. Some curves (back,
/// elastic, custom bezier) overshoot outside that range on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// CSS `ease`, equivalent to `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in`, equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`, equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`, equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve with control points `(x1, y1)` and `(x2, y2)`.
    /// x values must be in [0, 1], y values can be any float.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },

    /// Stepped animation with discrete jumps.
    Steps { count: u32, position: StepPosition },

    /// Named tween curve.
    Tween {
        curve: TweenCurve,
        direction: TweenDirection,
    },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::Linear
    }
}

impl EasingFunction {
    /// Evaluate the easing function at the given progress.
    ///
    /// Input is clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
            Self::Steps { count, position } => stepped(*count, *position, t),
            Self::Tween { curve, direction } => match direction {
                TweenDirection::In => curve.ease_in(t),
                TweenDirection::Out => 1.0 - curve.ease_in(1.0 - t),
                TweenDirection::InOut => {
                    if t < 0.5 {
                        0.5 * curve.ease_in(2.0 * t)
                    } else {
                        1.0 - 0.5 * curve.ease_in(2.0 - 2.0 * t)
                    }
                }
            },
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
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

    /// Create a named tween easing.
    pub fn tween(curve: TweenCurve, direction: TweenDirection) -> Self {
        Self::Tween { curve, direction }
    }
}

impl TweenCurve {
    fn ease_in(self, t: f32) -> f32 {
        match self {
            Self::Back => {
                const C1: f32 = 1.70158;
                t * t * ((C1 + 1.0) * t - C1)
            }
            Self::Bounce => 1.0 - bounce_out(1.0 - t),
            Self::Circular => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Self::Cubic => t * t * t,
            Self::Elastic => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    -(2.0f32).powf(10.0 * t - 10.0) * ((t * 10.0 - 10.75) * (2.0 * PI / 3.0)).sin()
                }
            }
            Self::Exponential => {
                if t <= 0.0 {
                    0.0
                } else {
                    (2.0f32).powf(10.0 * t - 10.0)
                }
            }
            Self::Linear => t,
            Self::Quadratic => t * t,
            Self::Quartic => t * t * t * t,
            Self::Quintic => t * t * t * t * t,
            Self::Sine => 1.0 - (t * PI * 0.5).cos(),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Solve the curve for `x = progress` and return its `y`.
///
/// Newton-Raphson on the x polynomial, starting from `t = progress`. Control
/// points with x in `[0, 1]` keep x(t) monotonic, so a handful of steps is enough.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 || progress >= 1.0 {
        return progress.clamp(0.0, 1.0);
    }

    let mut t = progress;
    for _ in 0..8 {
        let error = bezier(x1, x2, t) - progress;
        let slope = bezier_slope(x1, x2, t);
        if error.abs() < 1e-6 || slope.abs() < 1e-6 {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    bezier(y1, y2, t)
}

/// One coordinate of a unit cubic bezier (end points 0 and 1).
#[inline]
fn bezier(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    t * (3.0 * u * u * p1 + t * (3.0 * u * p2 + t))
}

#[inline]
fn bezier_slope(p1: f32, p2: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    3.0 * (u * u * p1 + 2.0 * u * t * (p2 - p1) + t * t * (1.0 - p2))
}

/// CSS `steps()`: count the jumps crossed so far and scale to `[0, 1]`.
fn stepped(steps: u32, position: StepPosition, t: f32) -> f32 {
    let steps = steps.max(1) as f32;
    let jumps = match position {
        StepPosition::Start | StepPosition::End => steps,
        StepPosition::Both => steps + 1.0,
        StepPosition::None => (steps - 1.0).max(1.0),
    };

    let mut step = (t * steps).floor();
    if matches!(position, StepPosition::Start | StepPosition::Both) {
        step += 1.0;
    }
    (step / jumps).clamp(0.0, 1.0)
}
