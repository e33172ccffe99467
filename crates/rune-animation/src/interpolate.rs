//! Interpolation of property values between two keys.
//!
//! This module provides the `Interpolate` trait for the value kinds a key can
//! hold, and [`interpolate_values`] which dispatches on [`PropertyValue`].
//!
//! # Colour Space Handling
//!
//! Colours are blended in the working space of [`crate::colour`] rather than
//! on their encoded bytes.
//!
//! # Transforms
//!
//! Transform endpoints must already be reconciled (same length, same primitive
//! kind at every position). Anything else is an internal inconsistency: it is
//! logged and the lower value is returned unchanged.

use tracing::warn;

use crate::colour::{mix_colours, Colourb};
use crate::config::AnimationConfig;
use crate::transform::Transform;
use crate::types::PropertyValue;

/// Trait for values that can be blended between two endpoints.
///
/// When `t = 0.0` the result is `self`, when `t = 1.0` it is `to`.
pub trait Interpolate: Sized {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        (1.0 - t) * *self + t * *to
    }
}

impl Interpolate for Colourb {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        mix_colours(*self, *to, t)
    }
}

impl Transform {
    /// Interpolate primitive by primitive, or `None` if the lists are not
    /// reconciled. `epsilon` is the singularity threshold for matrix primitives.
    pub fn try_interpolate(&self, to: &Self, t: f32, epsilon: f32) -> Option<Self> {
        if self.len() != to.len() {
            warn!(
                from = self.len(),
                to = to.len(),
                "transform lists differ in length"
            );
            return None;
        }

        let mut primitives = Vec::with_capacity(self.len());
        for (p0, p1) in self.primitives.iter().zip(&to.primitives) {
            match p0.interpolate_with(p1, t, epsilon) {
                Some(p) => primitives.push(p),
                None => {
                    warn!(
                        from = ?p0.kind(),
                        to = ?p1.kind(),
                        "transform primitives cannot be interpolated"
                    );
                    return None;
                }
            }
        }
        Some(Self { primitives })
    }
}

/// Blend two property values.
///
/// Mismatched kinds never fail the update: a warning is logged and `v0` is
/// returned as is. Matrix primitives use `config.decompose_epsilon`.
pub fn interpolate_values(
    v0: &PropertyValue,
    v1: &PropertyValue,
    alpha: f32,
    config: &AnimationConfig,
) -> PropertyValue {
    match (v0, v1) {
        (PropertyValue::Number(a), PropertyValue::Number(b)) => {
            PropertyValue::Number(a.interpolate(b, alpha))
        }
        (PropertyValue::Colour(a), PropertyValue::Colour(b)) => {
            PropertyValue::Colour(a.interpolate(b, alpha))
        }
        (PropertyValue::Transform(a), PropertyValue::Transform(b)) => a
            .try_interpolate(b, alpha, config.decompose_epsilon)
            .map(PropertyValue::Transform)
            .unwrap_or_else(|| v0.clone()),
        _ => {
            warn!(
                from = v0.kind_name(),
                to = v1.kind_name(),
                "only numbers, colours and transforms can be interpolated"
            );
            v0.clone()
        }
    }
}
