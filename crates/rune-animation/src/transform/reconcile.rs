//! Aligns the primitive lists of adjacent transform keys.
//!
//! Two transform lists can only be interpolated primitive by primitive when
//! they have the same length and the same primitive kind at every position.
//! Reconciliation establishes this once, when a key is added, trying in order:
//!
//! 1. same length: match kinds position by position, widening to generic forms;
//! 2. different length: align the shorter list as an ordered subsequence of the
//!    longer one and pad the gaps with identity primitives;
//! 3. otherwise: flatten both lists to matrices and decompose them.

use tracing::debug;

use super::primitive::TransformPrimitive;
use super::Transform;
use crate::config::AnimationConfig;
use crate::element::ElementGeometry;
use crate::error::{AnimationError, Result};
use crate::keyframes::AnimationKey;
use crate::types::PropertyValue;

/// Which side of a pair [`prepare_transform_pair`] modified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairChange {
    pub first: bool,
    pub second: bool,
}

impl PairChange {
    pub const UNCHANGED: Self = Self {
        first: false,
        second: false,
    };

    pub const BOTH: Self = Self {
        first: true,
        second: true,
    };
}

/// Make `t0` and `t1` pairwise interpolatable, mutating either or both.
///
/// Fails only when the decomposition fallback meets a singular matrix or a
/// unit that cannot be resolved against `element`.
pub fn prepare_transform_pair(
    t0: &mut Transform,
    t1: &mut Transform,
    element: &dyn ElementGeometry,
    config: &AnimationConfig,
) -> Result<PairChange> {
    if t0.len() == t1.len() {
        if let Some(change) = match_equal_length(t0, t1) {
            return Ok(change);
        }
    } else if let Some(change) = match_subsequence(t0, t1) {
        debug!(len = t0.len(), "padded transform with identity primitives");
        return Ok(change);
    }

    debug!(
        first = ?t0.kinds(),
        second = ?t1.kinds(),
        "transform primitives incompatible, decomposing"
    );
    let mut change = PairChange::UNCHANGED;
    for (t, changed) in [(t0, &mut change.first), (t1, &mut change.second)] {
        if !is_decomposed(t) {
            t.combine_and_decompose(element, config.decompose_epsilon)?;
            *changed = true;
        }
    }
    Ok(change)
}

/// Reconcile every adjacent pair from `start` onward, walking back whenever a
/// pair modified the earlier key so that its own predecessor is re-checked.
///
/// At most `config.reconcile_passes_per_key * keys.len()` pairs are
/// evaluated; running out is reported as [`AnimationError::ReconcileLimit`].
pub fn prepare_transforms(
    keys: &mut [AnimationKey],
    start: usize,
    element: &dyn ElementGeometry,
    config: &AnimationConfig,
) -> Result<()> {
    let max_passes = config.reconcile_passes_per_key * keys.len();
    let mut passes = 0;
    let mut i = start.max(1);

    while i < keys.len() {
        if passes == max_passes {
            return Err(AnimationError::ReconcileLimit { passes });
        }
        passes += 1;

        let (head, tail) = keys.split_at_mut(i);
        let t0 = transform_mut(&mut head[i - 1].value)?;
        let t1 = transform_mut(&mut tail[0].value)?;

        let change = prepare_transform_pair(t0, t1, element, config)?;
        if change.first && i > 1 {
            debug!(pair = i, "earlier key changed, re-checking its predecessor");
            i -= 1;
        } else {
            i += 1;
        }
    }

    Ok(())
}

fn transform_mut(value: &mut PropertyValue) -> Result<&mut Transform> {
    match value {
        PropertyValue::Transform(t) => Ok(t),
        other => Err(AnimationError::KindMismatch {
            expected: "transform",
            found: other.kind_name(),
        }),
    }
}

fn is_decomposed(t: &Transform) -> bool {
    matches!(t.primitives.as_slice(), [TransformPrimitive::Decomposed(_)])
}

/// Step 1. Returns `None` if some position cannot be matched; positions
/// widened before the failing one stay widened, which does not change either
/// transform's matrix.
fn match_equal_length(t0: &mut Transform, t1: &mut Transform) -> Option<PairChange> {
    let mut change = PairChange::UNCHANGED;
    for (p0, p1) in t0.primitives.iter_mut().zip(t1.primitives.iter_mut()) {
        let (k0, k1) = (p0.kind(), p1.kind());
        if k0 == k1 {
            continue;
        }
        if !TransformPrimitive::try_convert_to_matching_generic_type(p0, p1) {
            return None;
        }
        change.first |= p0.kind() != k0;
        change.second |= p1.kind() != k1;
    }
    Some(change)
}

/// Step 2. Each primitive of the shorter list must match (exactly or after
/// widening) a distinct primitive of the longer list, in increasing order.
/// Unmatched positions of the longer list become identity primitives in the
/// shorter one.
fn match_subsequence(t0: &mut Transform, t1: &mut Transform) -> Option<PairChange> {
    let first_is_small = t0.len() < t1.len();
    let (small, big) = if first_is_small {
        (&mut t0.primitives, &mut t1.primitives)
    } else {
        (&mut t1.primitives, &mut t0.primitives)
    };

    let mut matches = Vec::with_capacity(small.len() + 1);
    let mut changed_big = false;
    let mut i_big = 0;

    for p_small in small.iter_mut() {
        let mut found = false;
        while i_big < big.len() {
            let big_kind = big[i_big].kind();
            if p_small.kind() == big_kind
                || TransformPrimitive::try_convert_to_matching_generic_type(p_small, &mut big[i_big])
            {
                changed_big |= big[i_big].kind() != big_kind;
                matches.push(i_big);
                i_big += 1;
                found = true;
                break;
            }
            i_big += 1;
        }
        if !found {
            return None;
        }
    }

    matches.push(big.len());
    let mut next = 0;
    for m in matches {
        for i in next..m {
            let mut identity = big[i].clone();
            identity.set_identity();
            small.insert(i, identity);
        }
        next = m + 1;
    }

    let change = match (first_is_small, changed_big) {
        (_, true) => PairChange::BOTH,
        (true, false) => PairChange {
            first: true,
            second: false,
        },
        (false, false) => PairChange {
            first: false,
            second: true,
        },
    };
    Some(change)
}
