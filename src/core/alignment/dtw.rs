//! Penalized dynamic time warping over a precomputed distance matrix.
//!
//! The kernel relaxes the matrix in place: after the pass, cell `(i, j)`
//! holds the cost of the chosen path ending there and the companion
//! path-length matrix holds the number of moves on that path. Row 0 and
//! column 0 are never relaxed, so any border cell is a free path start.
//!
//! For each cell `(i + 1, j + 1)` the predecessors are tried in a fixed
//! order, which is the tie-break policy:
//!
//! 1. diagonal from `(i, j)`, no penalty, if it is no worse than either
//!    penalized alternative;
//! 2. horizontal from `(i, j + 1)` (the row advances), penalized;
//! 3. vertical from `(i + 1, j)` (the column advances), penalized.
//!
//! If no guard holds the cell keeps its raw distance. With exact arithmetic
//! one of the three always holds; only a wrapped addition can reach that
//! branch.
//!
//! # Overflow precondition
//!
//! A path visits at most `rows + cols - 1` cells, each contributing at most
//! `SYMBOL_BITS + penalty`. The caller must keep
//! `(rows + cols) * (SYMBOL_BITS + penalty) <= Cost::MAX`
//! ([`max_safe_penalty`] computes the limit). [`dtw_align`] does not check
//! this in the hot loop; [`dtw_align_checked`] does.

use crate::core::alignment::matrix::{Cost, DistanceMatrix, PathLengthMatrix};
use crate::defaults::SYMBOL_BITS;
use crate::error::{MatchError, Result};

/// Predecessor chosen for a relaxed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Diagonal,
    Horizontal,
    Vertical,
}

/// Border cell selected as the end of the best path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub row: usize,
    pub col: usize,
    pub cost: Cost,
    pub path_length: Cost,
    pub score: f64,
}

/// Align with a freshly allocated path-length matrix and return the
/// path-length normalized score of the best border endpoint.
///
/// `distance` is consumed as scratch: on return it holds cumulative costs.
pub fn dtw_align(distance: &mut DistanceMatrix, gully: f64, penalty: Cost) -> Result<f64> {
    let mut path_length = PathLengthMatrix::new(distance.rows(), distance.cols());
    dtw_align_with(distance, &mut path_length, gully, penalty)
}

/// Same as [`dtw_align`] with a caller-provided path-length buffer of the
/// same shape. The buffer is zeroed before use.
pub fn dtw_align_with(
    distance: &mut DistanceMatrix,
    path_length: &mut PathLengthMatrix,
    gully: f64,
    penalty: Cost,
) -> Result<f64> {
    validate(distance, path_length, gully)?;
    path_length.fill(0);
    relax(distance, path_length, penalty);
    Ok(find_endpoint(distance, path_length, gully).score)
}

/// Checked-arithmetic variant: every accumulation is `checked_add`, and an
/// overflow is reported instead of wrapping.
pub fn dtw_align_checked(distance: &mut DistanceMatrix, gully: f64, penalty: Cost) -> Result<f64> {
    let mut path_length = PathLengthMatrix::new(distance.rows(), distance.cols());
    validate(distance, &path_length, gully)?;
    relax_checked(distance, &mut path_length, penalty)?;
    Ok(find_endpoint(distance, &path_length, gully).score)
}

/// Largest penalty that keeps a `rows x cols` alignment within `Cost`.
///
/// Returns `None` when even a zero penalty cannot be guaranteed.
pub fn max_safe_penalty(rows: usize, cols: usize) -> Option<Cost> {
    let cells = rows.checked_add(cols)? as u64;
    if cells == 0 {
        return Some(Cost::MAX);
    }
    let per_cell = Cost::MAX as u64 / cells;
    per_cell
        .checked_sub(SYMBOL_BITS as u64)
        .map(|p| p.min(Cost::MAX as u64) as Cost)
}

fn validate(distance: &DistanceMatrix, path_length: &PathLengthMatrix, gully: f64) -> Result<()> {
    if distance.is_empty() {
        return Err(MatchError::EmptySequence {
            what: "distance matrix",
        });
    }
    if !(0.0..1.0).contains(&gully) {
        return Err(MatchError::InvalidGully(gully));
    }
    if path_length.shape() != distance.shape() {
        return Err(MatchError::ShapeMismatch {
            what: "path length matrix",
            expected: distance.shape(),
            actual: path_length.shape(),
        });
    }
    Ok(())
}

/// Guard evaluation for one cell, in diagonal → horizontal → vertical order.
///
/// `above_pen` / `left_pen` are `above + penalty` / `left + penalty`,
/// precomputed so the checked path can detect overflow once.
#[inline(always)]
fn choose_step(diag: Cost, above: Cost, left: Cost, above_pen: Cost, left_pen: Cost) -> Option<Step> {
    if diag <= above_pen && diag <= left_pen {
        Some(Step::Diagonal)
    } else if above <= left && above_pen <= diag {
        Some(Step::Horizontal)
    } else if left <= above && left_pen <= diag {
        Some(Step::Vertical)
    } else {
        None
    }
}

fn relax(distance: &mut DistanceMatrix, path_length: &mut PathLengthMatrix, penalty: Cost) {
    let (rows, cols) = distance.shape();
    let d = distance.as_mut_slice();
    let p = path_length.as_mut_slice();

    for i in 0..rows - 1 {
        let up = i * cols;
        let down = up + cols;
        for j in 0..cols - 1 {
            let diag = d[up + j];
            let above = d[up + j + 1];
            let left = d[down + j];
            let target = down + j + 1;

            match choose_step(diag, above, left, above + penalty, left + penalty) {
                Some(Step::Diagonal) => {
                    p[target] += p[up + j] + 1;
                    d[target] += diag;
                }
                Some(Step::Horizontal) => {
                    p[target] += p[up + j + 1] + 1;
                    d[target] += above + penalty;
                }
                Some(Step::Vertical) => {
                    p[target] += p[down + j] + 1;
                    d[target] += left + penalty;
                }
                None => {
                    log::trace!("dtw: no step admissible at ({}, {})", i + 1, j + 1);
                }
            }
        }
    }
}

fn relax_checked(
    distance: &mut DistanceMatrix,
    path_length: &mut PathLengthMatrix,
    penalty: Cost,
) -> Result<()> {
    let (rows, cols) = distance.shape();
    let d = distance.as_mut_slice();
    let p = path_length.as_mut_slice();

    for i in 0..rows - 1 {
        let up = i * cols;
        let down = up + cols;
        for j in 0..cols - 1 {
            let overflow = MatchError::CostOverflow {
                row: i + 1,
                col: j + 1,
                penalty,
            };
            let diag = d[up + j];
            let above = d[up + j + 1];
            let left = d[down + j];
            let above_pen = above.checked_add(penalty).ok_or_else(|| overflow.clone())?;
            let left_pen = left.checked_add(penalty).ok_or_else(|| overflow.clone())?;
            let target = down + j + 1;

            let (pred_cost, pred_len) = match choose_step(diag, above, left, above_pen, left_pen) {
                Some(Step::Diagonal) => (diag, p[up + j]),
                Some(Step::Horizontal) => (above_pen, p[up + j + 1]),
                Some(Step::Vertical) => (left_pen, p[down + j]),
                None => continue,
            };
            d[target] = d[target].checked_add(pred_cost).ok_or_else(|| overflow.clone())?;
            p[target] = pred_len
                .checked_add(1)
                .and_then(|len| p[target].checked_add(len))
                .ok_or(overflow)?;
        }
    }
    Ok(())
}

/// Pick the best endpoint on the last row / last column of a relaxed matrix.
///
/// Only rows (last column) and columns (last row) at or past
/// `floor(gully * min(rows, cols))` are eligible. The minimum of each border
/// is taken (first occurrence on ties); if the last-row candidate costs more
/// than the last-column candidate the endpoint moves to the last column,
/// otherwise it stays on the last row.
///
/// Border cells in row 0 / column 0 carry zero moves. They are not an
/// alignment, so their score is `f64::INFINITY` and they never rank ahead
/// of a real path.
pub fn find_endpoint(distance: &DistanceMatrix, path_length: &PathLengthMatrix, gully: f64) -> Endpoint {
    let (rows, cols) = distance.shape();
    let last_row = rows - 1;
    let last_col = cols - 1;
    let offset = (gully * rows.min(cols) as f64) as usize;

    let i = offset + argmin((offset..rows).map(|r| *distance.get(r, last_col)));
    let j = offset + argmin(distance.row(last_row)[offset..].iter().copied());

    let (row, col) = if distance.get(last_row, j) > distance.get(i, last_col) {
        (i, last_col)
    } else {
        (last_row, j)
    };

    let cost = *distance.get(row, col);
    let path_length = *path_length.get(row, col);
    let score = if path_length == 0 {
        f64::INFINITY
    } else {
        cost as f64 / path_length as f64
    };
    Endpoint {
        row,
        col,
        cost,
        path_length,
        score,
    }
}

/// Position of the first minimum.
#[inline]
fn argmin(values: impl Iterator<Item = Cost>) -> usize {
    let mut best = Cost::MAX;
    let mut best_idx = 0;
    for (idx, v) in values.enumerate() {
        if idx == 0 || v < best {
            best = v;
            best_idx = idx;
        }
    }
    best_idx
}
