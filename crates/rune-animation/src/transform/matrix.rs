//! 4x4 matrix decomposition for transform interpolation.
//!
//! A matrix is split into perspective, translation, rotation, shear and scale
//! so that two arbitrary matrices can be interpolated component by component
//! and recombined. The composition order is
//!
//! ```text
//! M = P * T * R * K * S
//! ```
//!
//! with `P` the perspective row, `T` translation, `R` a rotation quaternion, `K`
//! an upper unit-triangular shear and `S` a diagonal scale.

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// A matrix broken into independently interpolatable components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedMatrix4 {
    /// Bottom row of the perspective matrix, homogeneous scale in `w`;
    /// `(0, 0, 0, 1)` for affine transforms.
    pub perspective: Vec4,
    pub quaternion: Quat,
    pub translation: Vec3,
    pub scale: Vec3,
    /// Shear factors `(xy, xz, yz)`.
    pub skew: Vec3,
}

impl Default for DecomposedMatrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl DecomposedMatrix4 {
    pub const IDENTITY: Self = Self {
        perspective: Vec4::W,
        quaternion: Quat::IDENTITY,
        translation: Vec3::ZERO,
        scale: Vec3::ONE,
        skew: Vec3::ZERO,
    };

    /// Decompose `m`, or return `None` if it is singular.
    ///
    /// `epsilon` bounds the magnitude under which the determinant of the affine
    /// part or a scale factor counts as zero. The matrix is not normalised by
    /// its homogeneous scale: the whole bottom row, `w` included, is kept in
    /// `perspective`, so `recompose` returns `m` itself.
    pub fn decompose(m: Mat4, epsilon: f32) -> Option<Self> {
        // Affine part; also tells us whether the upper 3x3 is invertible.
        let mut affine = m;
        affine.x_axis.w = 0.0;
        affine.y_axis.w = 0.0;
        affine.z_axis.w = 0.0;
        affine.w_axis.w = 1.0;
        if affine.determinant().abs() < epsilon {
            return None;
        }

        // m = P * A, where P differs from identity only in its bottom row p.
        let bottom = m.row(3);
        let perspective = if bottom != Vec4::W {
            affine.inverse().transpose() * bottom
        } else {
            Vec4::W
        };

        let translation = m.w_axis.truncate();

        let c0 = m.x_axis.truncate();
        let c1 = m.y_axis.truncate();
        let c2 = m.z_axis.truncate();

        // Gram-Schmidt: c0 = sx*r0, c1 = sy*(kxy*r0 + r1), c2 = sz*(kxz*r0 + kyz*r1 + r2)
        let mut scale = Vec3::ZERO;
        scale.x = c0.length();
        let mut r0 = c0 / scale.x;

        let mut kxy = r0.dot(c1);
        let c1 = c1 - r0 * kxy;
        scale.y = c1.length();
        let mut r1 = c1 / scale.y;
        kxy /= scale.y;

        let mut kxz = r0.dot(c2);
        let mut kyz = r1.dot(c2);
        let c2 = c2 - r0 * kxz - r1 * kyz;
        scale.z = c2.length();
        let mut r2 = c2 / scale.z;
        kxz /= scale.z;
        kyz /= scale.z;

        if !scale.is_finite() || scale.min_element() < epsilon {
            return None;
        }

        // Left-handed basis: fold the reflection into the scale.
        if r0.dot(r1.cross(r2)) < 0.0 {
            scale = -scale;
            r0 = -r0;
            r1 = -r1;
            r2 = -r2;
        }

        let quaternion = Quat::from_mat3(&Mat3::from_cols(r0, r1, r2)).normalize();

        Some(Self {
            perspective,
            quaternion,
            translation,
            scale,
            skew: Vec3::new(kxy, kxz, kyz),
        })
    }

    /// Rebuild the matrix from its components.
    pub fn recompose(&self) -> Mat4 {
        let p = self.perspective;
        let perspective = Mat4::from_cols(
            Vec4::new(1.0, 0.0, 0.0, p.x),
            Vec4::new(0.0, 1.0, 0.0, p.y),
            Vec4::new(0.0, 0.0, 1.0, p.z),
            Vec4::new(0.0, 0.0, 0.0, p.w),
        );
        let shear = Mat4::from_cols(
            Vec4::X,
            Vec4::new(self.skew.x, 1.0, 0.0, 0.0),
            Vec4::new(self.skew.y, self.skew.z, 1.0, 0.0),
            Vec4::W,
        );

        perspective
            * Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.quaternion)
            * shear
            * Mat4::from_scale(self.scale)
    }

    /// Interpolate components; the rotation takes the shortest arc.
    pub fn interpolate(&self, to: &Self, alpha: f32) -> Self {
        Self {
            perspective: self.perspective.lerp(to.perspective, alpha),
            quaternion: self.quaternion.slerp(to.quaternion, alpha),
            translation: self.translation.lerp(to.translation, alpha),
            scale: self.scale.lerp(to.scale, alpha),
            skew: self.skew.lerp(to.skew, alpha),
        }
    }
}
