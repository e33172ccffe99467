//! Element geometry needed to resolve relative transform units.
//!
//! Transform primitives may carry lengths relative to the element they are
//! applied to (`50%`, `2em`). Timelines only need to turn those into pixels,
//! so they depend on this narrow trait rather than on a scene node.

use crate::types::{NumericValue, Unit};

/// Axis a length is measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Resolves relative lengths against an element's current geometry.
pub trait ElementGeometry {
    /// Resolve `value` along `axis` into pixels.
    ///
    /// Returns `None` when the unit is not a length or has no meaning on that
    /// axis (there is no reference depth for a percentage along z).
    fn resolve_length(&self, value: NumericValue, axis: Axis) -> Option<f32>;
}

/// Plain box geometry of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub root_font_size: f32,
}

impl Default for ElementBox {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            font_size: 16.0,
            root_font_size: 16.0,
        }
    }
}

impl ElementBox {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }
}

impl ElementGeometry for ElementBox {
    fn resolve_length(&self, value: NumericValue, axis: Axis) -> Option<f32> {
        match value.unit {
            Unit::Number | Unit::Px => Some(value.number),
            Unit::Em => Some(value.number * self.font_size),
            Unit::Rem => Some(value.number * self.root_font_size),
            Unit::Percent => match axis {
                Axis::X => Some(value.number * 0.01 * self.width),
                Axis::Y => Some(value.number * 0.01 * self.height),
                Axis::Z => None,
            },
            _ => None,
        }
    }
}
