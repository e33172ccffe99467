//! Property value types consumed and produced by keyframe timelines.
//!
//! This module defines:
//! - `Unit`: the declared unit of a property value
//! - `PropertyValue`: closed sum type over every value a key can hold
//! - `Property`: a value tagged with its unit and specificity

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::colour::Colourb;
use crate::error::{AnimationError, Result};
use crate::transform::Transform;

/// Declared unit of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Unitless number.
    Number,
    /// Absolute length in pixels.
    Px,
    /// Percentage of a reference length.
    Percent,
    /// Multiple of the element's font size.
    Em,
    /// Multiple of the root font size.
    Rem,
    /// Angle in degrees.
    Deg,
    /// Angle in radians.
    Rad,
    Colour,
    Transform,
    Keyword,
}

/// A number paired with its unit, as found inside transform primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericValue {
    pub number: f32,
    pub unit: Unit,
}

impl NumericValue {
    pub const fn new(number: f32, unit: Unit) -> Self {
        Self { number, unit }
    }

    pub const fn px(number: f32) -> Self {
        Self::new(number, Unit::Px)
    }

    pub const fn percent(number: f32) -> Self {
        Self::new(number, Unit::Percent)
    }

    pub const fn deg(number: f32) -> Self {
        Self::new(number, Unit::Deg)
    }

    pub const fn rad(number: f32) -> Self {
        Self::new(number, Unit::Rad)
    }

    /// Angle in radians, or `None` if this is not an angle.
    pub fn to_radians(self) -> Option<f32> {
        match self.unit {
            Unit::Rad => Some(self.number),
            Unit::Deg => Some(self.number.to_radians()),
            _ => None,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.number, self.unit)
    }
}

/// Every value kind a property key can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Number(f32),
    Integer(i32),
    Keyword(String),
    Colour(Colourb),
    Transform(Transform),
}

impl PropertyValue {
    /// Short kind name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Integer(_) => "integer",
            Self::Keyword(_) => "keyword",
            Self::Colour(_) => "colour",
            Self::Transform(_) => "transform",
        }
    }

    /// Convert into an interpolatable representation.
    ///
    /// Numbers, colours and transforms are already interpolatable. Integers
    /// widen to numbers and keywords are parsed as numbers if they can be.
    pub fn into_interpolatable(self) -> Result<Self> {
        match self {
            Self::Number(_) | Self::Colour(_) | Self::Transform(_) => Ok(self),
            Self::Integer(i) => Ok(Self::Number(i as f32)),
            Self::Keyword(s) => s
                .trim()
                .parse::<f32>()
                .map(Self::Number)
                .map_err(|_| AnimationError::Coercion(s)),
        }
    }

    /// Try to extract a number.
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to extract a colour.
    pub fn as_colour(&self) -> Option<Colourb> {
        match self {
            Self::Colour(c) => Some(*c),
            _ => None,
        }
    }

    /// Try to extract a transform.
    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Self::Transform(t) => Some(t),
            _ => None,
        }
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<Colourb> for PropertyValue {
    fn from(c: Colourb) -> Self {
        Self::Colour(c)
    }
}

impl From<Transform> for PropertyValue {
    fn from(t: Transform) -> Self {
        Self::Transform(t)
    }
}

/// A property value with its declared unit and cascade specificity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub value: PropertyValue,
    pub unit: Unit,
    pub specificity: i32,
}

impl Property {
    pub fn new(value: impl Into<PropertyValue>, unit: Unit) -> Self {
        Self {
            value: value.into(),
            unit,
            specificity: 0,
        }
    }

    pub fn with_specificity(mut self, specificity: i32) -> Self {
        self.specificity = specificity;
        self
    }

    pub fn number(value: f32) -> Self {
        Self::new(value, Unit::Number)
    }

    pub fn colour(colour: Colourb) -> Self {
        Self::new(colour, Unit::Colour)
    }

    pub fn transform(transform: Transform) -> Self {
        Self::new(transform, Unit::Transform)
    }
}
