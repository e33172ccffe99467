//! Error types for keyframe animations.

use thiserror::Error;

use crate::types::Unit;

/// Result type for animation operations.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Errors that can occur while scheduling keyframes.
///
/// None of these are fatal: a failed `add_key` leaves the timeline exactly as it
/// was before the call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The key's unit differs from the unit the timeline was created with.
    #[error("unit mismatch: animation uses {expected:?}, key has {found:?}")]
    UnitMismatch { expected: Unit, found: Unit },

    /// The timeline was created from a value that cannot be interpolated.
    #[error("animation is invalid and accepts no further keys")]
    InvalidAnimation,

    /// The key's value kind differs from the kind held by the existing keys.
    #[error("value kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// The value could not be converted into an interpolatable number.
    #[error("cannot coerce {0:?} into an interpolatable value")]
    Coercion(String),

    /// Keys must be appended in non-decreasing time order.
    #[error("key at {time}s precedes the previous key at {previous}s")]
    KeyOutOfOrder { time: f32, previous: f32 },

    /// A relative length could not be resolved against the element.
    #[error("cannot resolve {0} against the element")]
    UnresolvedUnit(String),

    /// A transform matrix could not be decomposed (e.g. zero scale).
    #[error("transform matrix is not decomposable")]
    Degenerate,

    /// Transform reconciliation did not settle within its pass budget.
    #[error("transform reconciliation did not settle after {passes} passes")]
    ReconcileLimit { passes: usize },
}

/// Errors that can occur while loading [`crate::AnimationConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
