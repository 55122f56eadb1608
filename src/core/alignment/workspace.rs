//! Thread-local workspace for reusable allocations
//!
//! The candidate loop builds one distance matrix and one path-length matrix
//! per surviving candidate. Candidates in the same length window have
//! similar shapes, so each thread keeps its own pair of buffers and reshapes
//! them instead of allocating per candidate. Rayon workers each get their
//! own workspace.

use std::cell::RefCell;

use crate::core::alignment::distance::pairwise_bit_distance_into;
use crate::core::alignment::dtw::dtw_align_with;
use crate::core::alignment::matrix::{Cost, DistanceMatrix, PathLengthMatrix};
use crate::core::compute::encoding::Symbol;
use crate::core::compute::popcount::PopcountTable;
use crate::error::Result;

/// Initial capacity per side (query/candidate length) for pre-allocation
const INITIAL_SEQ_LEN: usize = 256;

// Thread-local workspace for alignment buffers
thread_local! {
    static WORKSPACE: RefCell<AlignmentWorkspace> = RefCell::new(AlignmentWorkspace::new());
}

/// Reusable buffers for one alignment at a time
pub struct AlignmentWorkspace {
    /// Distance matrix, relaxed in place into cumulative costs
    pub distance: DistanceMatrix,
    /// Move counts for the relaxed paths
    pub path_length: PathLengthMatrix,
}

impl AlignmentWorkspace {
    /// Create a new workspace with pre-allocated buffers
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_SEQ_LEN)
    }

    /// Workspace whose buffers can hold a `seq_len x seq_len` alignment
    /// without reallocating.
    pub fn with_capacity(seq_len: usize) -> Self {
        let mut distance = DistanceMatrix::new(seq_len, seq_len);
        let mut path_length = PathLengthMatrix::new(seq_len, seq_len);
        distance.reshape(0, 0);
        path_length.reshape(0, 0);
        Self {
            distance,
            path_length,
        }
    }

    /// Reshape both buffers to `(rows, cols)`, zero-filled.
    #[inline]
    pub fn ensure_shape(&mut self, rows: usize, cols: usize) {
        self.distance.reshape(rows, cols);
        self.path_length.reshape(rows, cols);
    }

    /// Distance fill + DTW for one query/candidate pair using the
    /// workspace buffers.
    pub fn align(
        &mut self,
        query: &[Symbol],
        candidate: &[Symbol],
        table: &PopcountTable,
        gully: f64,
        penalty: Cost,
    ) -> Result<f64> {
        self.ensure_shape(query.len(), candidate.len());
        pairwise_bit_distance_into(query, candidate, table, &mut self.distance)?;
        dtw_align_with(&mut self.distance, &mut self.path_length, gully, penalty)
    }
}

impl Default for AlignmentWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Execute a closure with the thread-local workspace
///
/// Re-entrant: a nested call on the same thread (for example a match run
/// from inside another `with_workspace` closure) gets a fresh, unpooled
/// workspace instead of the borrowed thread-local one.
///
/// # Example
/// ```
/// use ferrous_hashmatch::core::alignment::workspace::with_workspace;
/// use ferrous_hashmatch::PopcountTable;
///
/// let score = with_workspace(|ws| {
///     ws.align(&[1, 2, 3], &[1, 2, 3], PopcountTable::global(), 0.0, 1)
/// })
/// .unwrap();
/// assert_eq!(score, 0.0);
/// ```
pub fn with_workspace<F, R>(f: F) -> R
where
    F: FnOnce(&mut AlignmentWorkspace) -> R,
{
    WORKSPACE.with(|ws| match ws.try_borrow_mut() {
        Ok(mut pooled) => f(&mut pooled),
        Err(_) => {
            log::trace!("with_workspace: thread-local workspace busy, using a fresh one");
            f(&mut AlignmentWorkspace::with_capacity(0))
        }
    })
}
