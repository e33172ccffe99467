//! Transform primitives: the individual functions of a CSS-like transform list.
//!
//! Every primitive knows how to
//! - produce its identity instance (`translate(0)`, `scale(1)`, ...),
//! - resolve relative units against an element,
//! - flatten itself into a 4x4 matrix,
//! - widen itself into the generic form of its family (`scaleX` → `scale3d`),
//! - interpolate with another primitive of the same kind.

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use super::matrix::DecomposedMatrix4;
use crate::element::{Axis, ElementGeometry};
use crate::error::{AnimationError, Result};
use crate::types::{NumericValue, Unit};

/// Discriminant of a [`TransformPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Matrix2D,
    Matrix3D,
    TranslateX,
    TranslateY,
    TranslateZ,
    Translate2D,
    Translate3D,
    ScaleX,
    ScaleY,
    ScaleZ,
    Scale2D,
    Scale3D,
    RotateX,
    RotateY,
    RotateZ,
    Rotate2D,
    Rotate3D,
    SkewX,
    SkewY,
    Skew2D,
    Perspective,
    Decomposed,
}

/// A single transform function.
///
/// Lengths are [`NumericValue`]s so that relative units survive until the
/// primitive is resolved against an element; angles may be in degrees or
/// radians until then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformPrimitive {
    /// CSS `matrix(a, b, c, d, e, f)`.
    Matrix2D { values: [f32; 6] },
    /// CSS `matrix3d(...)`, column-major.
    Matrix3D { matrix: Mat4 },
    TranslateX { x: NumericValue },
    TranslateY { y: NumericValue },
    TranslateZ { z: NumericValue },
    Translate2D { x: NumericValue, y: NumericValue },
    Translate3D {
        x: NumericValue,
        y: NumericValue,
        z: NumericValue,
    },
    ScaleX { x: f32 },
    ScaleY { y: f32 },
    ScaleZ { z: f32 },
    Scale2D { x: f32, y: f32 },
    Scale3D { x: f32, y: f32, z: f32 },
    RotateX { angle: NumericValue },
    RotateY { angle: NumericValue },
    RotateZ { angle: NumericValue },
    Rotate2D { angle: NumericValue },
    Rotate3D { axis: Vec3, angle: NumericValue },
    SkewX { angle: NumericValue },
    SkewY { angle: NumericValue },
    Skew2D { x: NumericValue, y: NumericValue },
    Perspective { distance: NumericValue },
    /// Result of decomposing a whole transform list into one matrix.
    Decomposed(DecomposedMatrix4),
}

impl TransformPrimitive {
    pub fn translate(x: NumericValue, y: NumericValue) -> Self {
        Self::Translate2D { x, y }
    }

    pub fn scale(x: f32, y: f32) -> Self {
        Self::Scale2D { x, y }
    }

    pub fn rotate(angle: NumericValue) -> Self {
        Self::Rotate2D { angle }
    }

    pub fn skew(x: NumericValue, y: NumericValue) -> Self {
        Self::Skew2D { x, y }
    }

    pub fn perspective(distance: NumericValue) -> Self {
        Self::Perspective { distance }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Matrix2D { .. } => PrimitiveKind::Matrix2D,
            Self::Matrix3D { .. } => PrimitiveKind::Matrix3D,
            Self::TranslateX { .. } => PrimitiveKind::TranslateX,
            Self::TranslateY { .. } => PrimitiveKind::TranslateY,
            Self::TranslateZ { .. } => PrimitiveKind::TranslateZ,
            Self::Translate2D { .. } => PrimitiveKind::Translate2D,
            Self::Translate3D { .. } => PrimitiveKind::Translate3D,
            Self::ScaleX { .. } => PrimitiveKind::ScaleX,
            Self::ScaleY { .. } => PrimitiveKind::ScaleY,
            Self::ScaleZ { .. } => PrimitiveKind::ScaleZ,
            Self::Scale2D { .. } => PrimitiveKind::Scale2D,
            Self::Scale3D { .. } => PrimitiveKind::Scale3D,
            Self::RotateX { .. } => PrimitiveKind::RotateX,
            Self::RotateY { .. } => PrimitiveKind::RotateY,
            Self::RotateZ { .. } => PrimitiveKind::RotateZ,
            Self::Rotate2D { .. } => PrimitiveKind::Rotate2D,
            Self::Rotate3D { .. } => PrimitiveKind::Rotate3D,
            Self::SkewX { .. } => PrimitiveKind::SkewX,
            Self::SkewY { .. } => PrimitiveKind::SkewY,
            Self::Skew2D { .. } => PrimitiveKind::Skew2D,
            Self::Perspective { .. } => PrimitiveKind::Perspective,
            Self::Decomposed(_) => PrimitiveKind::Decomposed,
        }
    }

    /// Replace the payload with the identity of this kind, keeping the kind
    /// (and the axis, for `rotate3d`).
    pub fn set_identity(&mut self) {
        let zero = NumericValue::px(0.0);
        let no_angle = NumericValue::rad(0.0);
        *self = match self {
            Self::Matrix2D { .. } => Self::Matrix2D {
                values: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            },
            Self::Matrix3D { .. } => Self::Matrix3D {
                matrix: Mat4::IDENTITY,
            },
            Self::TranslateX { .. } => Self::TranslateX { x: zero },
            Self::TranslateY { .. } => Self::TranslateY { y: zero },
            Self::TranslateZ { .. } => Self::TranslateZ { z: zero },
            Self::Translate2D { .. } => Self::Translate2D { x: zero, y: zero },
            Self::Translate3D { .. } => Self::Translate3D {
                x: zero,
                y: zero,
                z: zero,
            },
            Self::ScaleX { .. } => Self::ScaleX { x: 1.0 },
            Self::ScaleY { .. } => Self::ScaleY { y: 1.0 },
            Self::ScaleZ { .. } => Self::ScaleZ { z: 1.0 },
            Self::Scale2D { .. } => Self::Scale2D { x: 1.0, y: 1.0 },
            Self::Scale3D { .. } => Self::Scale3D {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
            Self::RotateX { .. } => Self::RotateX { angle: no_angle },
            Self::RotateY { .. } => Self::RotateY { angle: no_angle },
            Self::RotateZ { .. } => Self::RotateZ { angle: no_angle },
            Self::Rotate2D { .. } => Self::Rotate2D { angle: no_angle },
            Self::Rotate3D { axis, .. } => Self::Rotate3D {
                axis: *axis,
                angle: no_angle,
            },
            Self::SkewX { .. } => Self::SkewX { angle: no_angle },
            Self::SkewY { .. } => Self::SkewY { angle: no_angle },
            Self::Skew2D { .. } => Self::Skew2D {
                x: no_angle,
                y: no_angle,
            },
            Self::Perspective { .. } => Self::Perspective {
                distance: NumericValue::px(f32::INFINITY),
            },
            Self::Decomposed(_) => Self::Decomposed(DecomposedMatrix4::IDENTITY),
        };
    }

    /// Convert relative lengths to pixels and angles to radians, in place.
    pub fn resolve_units(&mut self, element: &dyn ElementGeometry) -> Result<()> {
        match self {
            Self::TranslateX { x } => resolve_length(x, Axis::X, element),
            Self::TranslateY { y } => resolve_length(y, Axis::Y, element),
            Self::TranslateZ { z } => resolve_length(z, Axis::Z, element),
            Self::Translate2D { x, y } => {
                resolve_length(x, Axis::X, element)?;
                resolve_length(y, Axis::Y, element)
            }
            Self::Translate3D { x, y, z } => {
                resolve_length(x, Axis::X, element)?;
                resolve_length(y, Axis::Y, element)?;
                resolve_length(z, Axis::Z, element)
            }
            Self::RotateX { angle }
            | Self::RotateY { angle }
            | Self::RotateZ { angle }
            | Self::Rotate2D { angle }
            | Self::Rotate3D { angle, .. }
            | Self::SkewX { angle }
            | Self::SkewY { angle } => resolve_angle(angle),
            Self::Skew2D { x, y } => {
                resolve_angle(x)?;
                resolve_angle(y)
            }
            Self::Perspective { distance } => {
                if distance.number.is_infinite() {
                    Ok(())
                } else {
                    resolve_length(distance, Axis::Z, element)
                }
            }
            Self::Matrix2D { .. }
            | Self::Matrix3D { .. }
            | Self::ScaleX { .. }
            | Self::ScaleY { .. }
            | Self::ScaleZ { .. }
            | Self::Scale2D { .. }
            | Self::Scale3D { .. }
            | Self::Decomposed(_) => Ok(()),
        }
    }

    /// Flatten this primitive into a matrix, resolving units on a copy.
    pub fn to_matrix(&self, element: &dyn ElementGeometry) -> Result<Mat4> {
        let mut resolved = self.clone();
        resolved.resolve_units(element)?;

        let m = match resolved {
            Self::Matrix2D { values } => matrix_2d(values),
            Self::Matrix3D { matrix } => matrix,
            Self::TranslateX { x } => Mat4::from_translation(Vec3::new(x.number, 0.0, 0.0)),
            Self::TranslateY { y } => Mat4::from_translation(Vec3::new(0.0, y.number, 0.0)),
            Self::TranslateZ { z } => Mat4::from_translation(Vec3::new(0.0, 0.0, z.number)),
            Self::Translate2D { x, y } => Mat4::from_translation(Vec3::new(x.number, y.number, 0.0)),
            Self::Translate3D { x, y, z } => {
                Mat4::from_translation(Vec3::new(x.number, y.number, z.number))
            }
            Self::ScaleX { x } => Mat4::from_scale(Vec3::new(x, 1.0, 1.0)),
            Self::ScaleY { y } => Mat4::from_scale(Vec3::new(1.0, y, 1.0)),
            Self::ScaleZ { z } => Mat4::from_scale(Vec3::new(1.0, 1.0, z)),
            Self::Scale2D { x, y } => Mat4::from_scale(Vec3::new(x, y, 1.0)),
            Self::Scale3D { x, y, z } => Mat4::from_scale(Vec3::new(x, y, z)),
            Self::RotateX { angle } => Mat4::from_rotation_x(angle.number),
            Self::RotateY { angle } => Mat4::from_rotation_y(angle.number),
            Self::RotateZ { angle } | Self::Rotate2D { angle } => Mat4::from_rotation_z(angle.number),
            Self::Rotate3D { axis, angle } => match axis.try_normalize() {
                Some(axis) => Mat4::from_axis_angle(axis, angle.number),
                None => Mat4::IDENTITY,
            },
            Self::SkewX { angle } => skew_matrix(angle.number, 0.0),
            Self::SkewY { angle } => skew_matrix(0.0, angle.number),
            Self::Skew2D { x, y } => skew_matrix(x.number, y.number),
            Self::Perspective { distance } => {
                let mut m = Mat4::IDENTITY;
                m.z_axis.w = -inverse_distance(distance.number);
                m
            }
            Self::Decomposed(d) => d.recompose(),
        };
        Ok(m)
    }

    /// Generic form of this primitive's family, or `None` if it has no family.
    fn to_generic(&self) -> Option<Self> {
        let zero = NumericValue::px(0.0);
        let no_angle = NumericValue::rad(0.0);
        let generic = match self {
            Self::Matrix2D { values } => Self::Matrix3D {
                matrix: matrix_2d(*values),
            },
            Self::Matrix3D { .. }
            | Self::Translate3D { .. }
            | Self::Scale3D { .. }
            | Self::Rotate3D { .. }
            | Self::Skew2D { .. } => self.clone(),
            Self::TranslateX { x } => Self::Translate3D { x: *x, y: zero, z: zero },
            Self::TranslateY { y } => Self::Translate3D { x: zero, y: *y, z: zero },
            Self::TranslateZ { z } => Self::Translate3D { x: zero, y: zero, z: *z },
            Self::Translate2D { x, y } => Self::Translate3D { x: *x, y: *y, z: zero },
            Self::ScaleX { x } => Self::Scale3D { x: *x, y: 1.0, z: 1.0 },
            Self::ScaleY { y } => Self::Scale3D { x: 1.0, y: *y, z: 1.0 },
            Self::ScaleZ { z } => Self::Scale3D { x: 1.0, y: 1.0, z: *z },
            Self::Scale2D { x, y } => Self::Scale3D { x: *x, y: *y, z: 1.0 },
            Self::RotateX { angle } => Self::Rotate3D { axis: Vec3::X, angle: *angle },
            Self::RotateY { angle } => Self::Rotate3D { axis: Vec3::Y, angle: *angle },
            Self::RotateZ { angle } | Self::Rotate2D { angle } => Self::Rotate3D {
                axis: Vec3::Z,
                angle: *angle,
            },
            Self::SkewX { angle } => Self::Skew2D { x: *angle, y: no_angle },
            Self::SkewY { angle } => Self::Skew2D { x: no_angle, y: *angle },
            Self::Perspective { .. } | Self::Decomposed(_) => return None,
        };
        Some(generic)
    }

    /// Make `p0` and `p1` the same kind by widening both to their shared
    /// generic form. Returns `false`, leaving both untouched, if they belong to
    /// different families.
    pub fn try_convert_to_matching_generic_type(p0: &mut Self, p1: &mut Self) -> bool {
        if p0.kind() == p1.kind() {
            return true;
        }

        let (Some(g0), Some(g1)) = (p0.to_generic(), p1.to_generic()) else {
            return false;
        };
        if g0.kind() != g1.kind() {
            return false;
        }

        *p0 = g0;
        *p1 = g1;
        true
    }

    /// Interpolate towards `other`, which must be the same kind.
    ///
    /// Returns `None` on a kind mismatch or on incompatible units. Matrix
    /// primitives are blended through decomposition, treating determinants
    /// below `epsilon` as singular.
    pub fn interpolate_with(&self, other: &Self, alpha: f32, epsilon: f32) -> Option<Self> {
        let p = match (self, other) {
            (Self::Matrix2D { values: a }, Self::Matrix2D { values: b }) => Self::Matrix2D {
                values: matrix_2d_values(interpolate_matrix(matrix_2d(*a), matrix_2d(*b), alpha, epsilon)),
            },
            (Self::Matrix3D { matrix: a }, Self::Matrix3D { matrix: b }) => Self::Matrix3D {
                matrix: interpolate_matrix(*a, *b, alpha, epsilon),
            },
            (Self::TranslateX { x: a }, Self::TranslateX { x: b }) => Self::TranslateX {
                x: lerp_value(*a, *b, alpha)?,
            },
            (Self::TranslateY { y: a }, Self::TranslateY { y: b }) => Self::TranslateY {
                y: lerp_value(*a, *b, alpha)?,
            },
            (Self::TranslateZ { z: a }, Self::TranslateZ { z: b }) => Self::TranslateZ {
                z: lerp_value(*a, *b, alpha)?,
            },
            (Self::Translate2D { x: ax, y: ay }, Self::Translate2D { x: bx, y: by }) => {
                Self::Translate2D {
                    x: lerp_value(*ax, *bx, alpha)?,
                    y: lerp_value(*ay, *by, alpha)?,
                }
            }
            (
                Self::Translate3D { x: ax, y: ay, z: az },
                Self::Translate3D { x: bx, y: by, z: bz },
            ) => Self::Translate3D {
                x: lerp_value(*ax, *bx, alpha)?,
                y: lerp_value(*ay, *by, alpha)?,
                z: lerp_value(*az, *bz, alpha)?,
            },
            (Self::ScaleX { x: a }, Self::ScaleX { x: b }) => Self::ScaleX {
                x: lerp(*a, *b, alpha),
            },
            (Self::ScaleY { y: a }, Self::ScaleY { y: b }) => Self::ScaleY {
                y: lerp(*a, *b, alpha),
            },
            (Self::ScaleZ { z: a }, Self::ScaleZ { z: b }) => Self::ScaleZ {
                z: lerp(*a, *b, alpha),
            },
            (Self::Scale2D { x: ax, y: ay }, Self::Scale2D { x: bx, y: by }) => Self::Scale2D {
                x: lerp(*ax, *bx, alpha),
                y: lerp(*ay, *by, alpha),
            },
            (Self::Scale3D { x: ax, y: ay, z: az }, Self::Scale3D { x: bx, y: by, z: bz }) => {
                Self::Scale3D {
                    x: lerp(*ax, *bx, alpha),
                    y: lerp(*ay, *by, alpha),
                    z: lerp(*az, *bz, alpha),
                }
            }
            (Self::RotateX { angle: a }, Self::RotateX { angle: b }) => Self::RotateX {
                angle: lerp_value(*a, *b, alpha)?,
            },
            (Self::RotateY { angle: a }, Self::RotateY { angle: b }) => Self::RotateY {
                angle: lerp_value(*a, *b, alpha)?,
            },
            (Self::RotateZ { angle: a }, Self::RotateZ { angle: b }) => Self::RotateZ {
                angle: lerp_value(*a, *b, alpha)?,
            },
            (Self::Rotate2D { angle: a }, Self::Rotate2D { angle: b }) => Self::Rotate2D {
                angle: lerp_value(*a, *b, alpha)?,
            },
            (
                Self::Rotate3D { axis: axis0, angle: a },
                Self::Rotate3D { axis: axis1, angle: b },
            ) => interpolate_rotate_3d(*axis0, *a, *axis1, *b, alpha)?,
            (Self::SkewX { angle: a }, Self::SkewX { angle: b }) => Self::SkewX {
                angle: lerp_value(*a, *b, alpha)?,
            },
            (Self::SkewY { angle: a }, Self::SkewY { angle: b }) => Self::SkewY {
                angle: lerp_value(*a, *b, alpha)?,
            },
            (Self::Skew2D { x: ax, y: ay }, Self::Skew2D { x: bx, y: by }) => Self::Skew2D {
                x: lerp_value(*ax, *bx, alpha)?,
                y: lerp_value(*ay, *by, alpha)?,
            },
            (Self::Perspective { distance: a }, Self::Perspective { distance: b }) => {
                if a.unit != b.unit && !(a.number.is_infinite() || b.number.is_infinite()) {
                    return None;
                }
                // Interpolate in 1/d so that an infinite (identity) distance blends smoothly.
                let inv = lerp(inverse_distance(a.number), inverse_distance(b.number), alpha);
                let unit = if a.number.is_infinite() { b.unit } else { a.unit };
                Self::Perspective {
                    distance: NumericValue::new(if inv > 0.0 { 1.0 / inv } else { f32::INFINITY }, unit),
                }
            }
            (Self::Decomposed(a), Self::Decomposed(b)) => Self::Decomposed(a.interpolate(b, alpha)),
            _ => return None,
        };
        Some(p)
    }
}

fn resolve_length(value: &mut NumericValue, axis: Axis, element: &dyn ElementGeometry) -> Result<()> {
    if value.unit == Unit::Px {
        return Ok(());
    }
    let px = element
        .resolve_length(*value, axis)
        .ok_or_else(|| AnimationError::UnresolvedUnit(value.to_string()))?;
    *value = NumericValue::px(px);
    Ok(())
}

fn resolve_angle(value: &mut NumericValue) -> Result<()> {
    let rad = value
        .to_radians()
        .ok_or_else(|| AnimationError::UnresolvedUnit(value.to_string()))?;
    *value = NumericValue::rad(rad);
    Ok(())
}

#[inline]
fn lerp(a: f32, b: f32, alpha: f32) -> f32 {
    (1.0 - alpha) * a + alpha * b
}

/// Lerp two values of the same unit; angles in different units meet in radians.
fn lerp_value(a: NumericValue, b: NumericValue, alpha: f32) -> Option<NumericValue> {
    if a.unit == b.unit {
        return Some(NumericValue::new(lerp(a.number, b.number, alpha), a.unit));
    }
    let (a, b) = (a.to_radians()?, b.to_radians()?);
    Some(NumericValue::rad(lerp(a, b, alpha)))
}

fn interpolate_rotate_3d(
    axis0: Vec3,
    angle0: NumericValue,
    axis1: Vec3,
    angle1: NumericValue,
    alpha: f32,
) -> Option<TransformPrimitive> {
    let n0 = axis0.try_normalize().unwrap_or(Vec3::Z);
    let n1 = axis1.try_normalize().unwrap_or(Vec3::Z);

    // Shared axis: interpolate the angle so multi-turn rotations are kept.
    if n0.dot(n1) > 1.0 - 1e-5 {
        return Some(TransformPrimitive::Rotate3D {
            axis: axis0,
            angle: lerp_value(angle0, angle1, alpha)?,
        });
    }

    let q0 = Quat::from_axis_angle(n0, angle0.to_radians()?);
    let q1 = Quat::from_axis_angle(n1, angle1.to_radians()?);
    let (axis, angle) = q0.slerp(q1, alpha).to_axis_angle();
    Some(TransformPrimitive::Rotate3D {
        axis,
        angle: NumericValue::rad(angle),
    })
}

fn interpolate_matrix(a: Mat4, b: Mat4, alpha: f32, epsilon: f32) -> Mat4 {
    match (
        DecomposedMatrix4::decompose(a, epsilon),
        DecomposedMatrix4::decompose(b, epsilon),
    ) {
        (Some(da), Some(db)) => da.interpolate(&db, alpha).recompose(),
        _ => a * (1.0 - alpha) + b * alpha,
    }
}

fn inverse_distance(distance: f32) -> f32 {
    if distance.is_infinite() {
        0.0
    } else {
        1.0 / distance.max(1.0)
    }
}

/// `matrix(a, b, c, d, e, f)` maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`.
fn matrix_2d(v: [f32; 6]) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(v[0], v[1], 0.0, 0.0),
        Vec4::new(v[2], v[3], 0.0, 0.0),
        Vec4::Z,
        Vec4::new(v[4], v[5], 0.0, 1.0),
    )
}

fn matrix_2d_values(m: Mat4) -> [f32; 6] {
    [m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, m.w_axis.x, m.w_axis.y]
}

fn skew_matrix(x: f32, y: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, y.tan(), 0.0, 0.0),
        Vec4::new(x.tan(), 1.0, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}
