//! LB_Keogh bound on the normalized DTW cost.
//!
//! For every position where the candidate leaves the query envelope, the
//! bit distance to the violated envelope edge is accumulated; positions
//! inside `[lower, upper]` contribute nothing. The sum is divided by the
//! compared length, matching the path-length normalization of the DTW score.
//!
//! The envelope and the candidate are compared over their common prefix:
//! whichever is longer is truncated from the end.

use crate::core::compute::encoding::Symbol;
use crate::core::compute::popcount::PopcountTable;
use crate::error::{MatchError, Result};

/// Keogh bound of `y` against the envelope `(upper, lower)`.
pub fn keogh_bound(upper: &[Symbol], lower: &[Symbol], y: &[Symbol], table: &PopcountTable) -> Result<f64> {
    if upper.len() != lower.len() {
        return Err(MatchError::ShapeMismatch {
            what: "envelope",
            expected: (upper.len(), 1),
            actual: (lower.len(), 1),
        });
    }
    if upper.is_empty() {
        return Err(MatchError::EmptySequence { what: "envelope" });
    }
    if y.is_empty() {
        return Err(MatchError::EmptySequence { what: "y" });
    }
    Ok(bound_unchecked(upper, lower, y, table))
}

#[inline]
pub(crate) fn bound_unchecked(upper: &[Symbol], lower: &[Symbol], y: &[Symbol], table: &PopcountTable) -> f64 {
    let len = upper.len().min(lower.len()).min(y.len());
    if len == 0 {
        return 0.0;
    }

    let mut sum: u64 = 0;
    for ((&v, &u), &l) in y[..len].iter().zip(&upper[..len]).zip(&lower[..len]) {
        if v > u {
            sum += table.distance(v, u) as u64;
        } else if v < l {
            sum += table.distance(v, l) as u64;
        }
    }
    sum as f64 / len as f64
}
