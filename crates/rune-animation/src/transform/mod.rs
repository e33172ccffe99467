//! Transform values: ordered lists of transform primitives.
//!
//! - `primitive`: the individual transform functions
//! - `matrix`: 4x4 decomposition used for matrix-level interpolation
//! - `reconcile`: aligns the primitive lists of adjacent keys

pub mod matrix;
pub mod primitive;
pub mod reconcile;

use glam::Mat4;
use serde::{Deserialize, Serialize};

pub use matrix::DecomposedMatrix4;
pub use primitive::{PrimitiveKind, TransformPrimitive};
pub use reconcile::{prepare_transform_pair, prepare_transforms, PairChange};

use crate::element::ElementGeometry;
use crate::error::{AnimationError, Result};

/// An ordered transform list; primitives apply left to right as in CSS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub primitives: Vec<TransformPrimitive>,
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_primitives(primitives: Vec<TransformPrimitive>) -> Self {
        Self { primitives }
    }

    /// Append a primitive (builder style).
    pub fn with(mut self, primitive: TransformPrimitive) -> Self {
        self.primitives.push(primitive);
        self
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn kinds(&self) -> Vec<PrimitiveKind> {
        self.primitives.iter().map(TransformPrimitive::kind).collect()
    }

    /// Resolve relative units of every primitive.
    pub fn resolve_units(&mut self, element: &dyn ElementGeometry) -> Result<()> {
        self.primitives
            .iter_mut()
            .try_for_each(|p| p.resolve_units(element))
    }

    /// Compose all primitives into a single matrix.
    pub fn to_matrix(&self, element: &dyn ElementGeometry) -> Result<Mat4> {
        self.primitives
            .iter()
            .try_fold(Mat4::IDENTITY, |m, p| Ok(m * p.to_matrix(element)?))
    }

    /// Replace the list with one `Decomposed` primitive equivalent to its matrix.
    pub fn combine_and_decompose(&mut self, element: &dyn ElementGeometry, epsilon: f32) -> Result<()> {
        let m = self.to_matrix(element)?;
        let decomposed = DecomposedMatrix4::decompose(m, epsilon).ok_or(AnimationError::Degenerate)?;
        self.primitives = vec![TransformPrimitive::Decomposed(decomposed)];
        Ok(())
    }
}
