//! Pairwise bit distance between two symbol sequences.
//!
//! Cell `(m, n)` of the output is the Hamming distance between `x[m]` and
//! `y[n]`, looked up as `table[x[m] ^ y[n]]`. This O(|x|·|y|) pass is the
//! dominant cost for every candidate that survives the Keogh gate.

use crate::core::alignment::matrix::{Cost, DistanceMatrix};
use crate::core::compute::encoding::Symbol;
use crate::core::compute::popcount::PopcountTable;
use crate::error::{MatchError, Result};

/// Allocate and fill the `(|x|, |y|)` distance matrix.
pub fn pairwise_bit_distance(
    x: &[Symbol],
    y: &[Symbol],
    table: &PopcountTable,
) -> Result<DistanceMatrix> {
    let mut output = DistanceMatrix::new(x.len(), y.len());
    pairwise_bit_distance_into(x, y, table, &mut output)?;
    Ok(output)
}

/// Fill a caller-allocated matrix. Its shape must already be `(|x|, |y|)`.
pub fn pairwise_bit_distance_into(
    x: &[Symbol],
    y: &[Symbol],
    table: &PopcountTable,
    output: &mut DistanceMatrix,
) -> Result<()> {
    if x.is_empty() {
        return Err(MatchError::EmptySequence { what: "x" });
    }
    if y.is_empty() {
        return Err(MatchError::EmptySequence { what: "y" });
    }
    if output.shape() != (x.len(), y.len()) {
        return Err(MatchError::ShapeMismatch {
            what: "distance matrix",
            expected: (x.len(), y.len()),
            actual: output.shape(),
        });
    }

    fill_distances(x, y, table.as_slice(), output);
    Ok(())
}

#[inline]
fn fill_distances(x: &[Symbol], y: &[Symbol], counts: &[u8], output: &mut DistanceMatrix) {
    for (m, &xm) in x.iter().enumerate() {
        let row = output.row_mut(m);
        for (cell, &yn) in row.iter_mut().zip(y) {
            *cell = counts[(xm ^ yn) as usize] as Cost;
        }
    }
}
