//! Per-property keyframe animation for rune elements.
//!
//! This crate provides:
//! - **Timelines**: one `ElementAnimation` per animated property, with looping,
//!   alternating direction and per-key tweens
//! - **Interpolation**: numbers, colours (blended in a linear working space) and
//!   transform lists
//! - **Transform reconciliation**: aligns the primitive lists of adjacent keys so
//!   they can be interpolated pairwise, falling back to matrix decomposition
//! - **Easing Functions**: CSS timing functions and named tween curves
//!
//! # Architecture
//!
//! ```text
//! ElementAnimation
//!   ├── AnimationKey[] (time, value, tween)
//!   ├── add_key ──> transform::prepare_transforms (on transform keys)
//!   └── update_and_get_property ──> interpolate_values
//!                                     ├── colour (working space blend)
//!                                     └── TransformPrimitive::interpolate_with
//! ```
//!
//! The orchestrator that creates timelines and applies their output to an
//! element's style lives outside this crate. Relative transform units are
//! resolved through the [`ElementGeometry`] trait.

pub mod colour;
pub mod config;
pub mod easing;
pub mod element;
pub mod error;
pub mod interpolate;
pub mod keyframes;
pub mod transform;
pub mod types;

pub use colour::{colour_from_linear_space, colour_to_linear_space, Colourb, Colourf};
pub use config::AnimationConfig;
pub use easing::{EasingFunction, StepPosition, TweenCurve, TweenDirection};
pub use element::{Axis, ElementBox, ElementGeometry};
pub use error::{AnimationError, ConfigError, Result};
pub use interpolate::{interpolate_values, Interpolate};
pub use keyframes::{AnimationKey, ElementAnimation, ElementAnimationOrigin, IterationCount};
pub use transform::{DecomposedMatrix4, PrimitiveKind, Transform, TransformPrimitive};
pub use types::{NumericValue, Property, PropertyValue, Unit};
