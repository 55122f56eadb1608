//! ferrous-hashmatch: rank hash-code sequences against a query with
//! bit-distance dynamic time warping.
//!
//! The pipeline is:
//!
//! 1. restrict a length-sorted candidate list to the lengths within a
//!    tolerance of the query,
//! 2. gate each candidate with a Keogh envelope bound,
//! 3. build the pairwise Hamming distance matrix for survivors,
//! 4. relax it with a penalized DTW recurrence and read a path-length
//!    normalized score off the bottom/right border,
//! 5. return `(index, score)` pairs in ascending score order.
//!
//! ```
//! use ferrous_hashmatch::{MatchOpt, match_sequence};
//!
//! let query: Vec<u16> = vec![3, 7, 7, 12, 40, 41];
//! let candidates = vec![vec![3u16, 7, 12, 40, 41, 41], vec![900u16, 901, 902, 903, 904, 905]];
//! let lengths = vec![6, 6];
//!
//! let results = match_sequence(&query, 6.0, &candidates, &lengths, &MatchOpt::default()).unwrap();
//! assert_eq!(results[0].index, 0);
//! ```

pub mod core;
pub mod defaults;
pub mod error;
pub mod match_opt;
pub mod pipelines;

pub use crate::core::alignment::distance::{pairwise_bit_distance, pairwise_bit_distance_into};
pub use crate::core::alignment::dtw::{dtw_align, dtw_align_checked, dtw_align_with};
pub use crate::core::alignment::matrix::{Cost, DistanceMatrix, Matrix, PathLengthMatrix};
pub use crate::core::bound::envelope::{Envelope, compute_envelope};
pub use crate::core::bound::keogh::keogh_bound;
pub use crate::core::compute::encoding::{Symbol, bits_to_symbols, symbols_to_bits};
pub use crate::core::compute::popcount::PopcountTable;
pub use crate::error::{MatchError, Result};
pub use crate::match_opt::{Execution, MatchOpt, ParallelPruning};
pub use crate::pipelines::matcher::{MatchResult, SequenceMatcher, length_window, match_sequence};
