//! Error taxonomy for the matching pipeline.
//!
//! Everything here is raised at an entry point before any matrix work
//! starts. The inner loops (distance fill, DP relaxation, envelope sweep)
//! never fail under their documented preconditions.

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("{what} sequence is empty")]
    EmptySequence { what: &'static str },

    #[error("{what}: expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("candidate {index} is empty")]
    EmptyCandidate { index: usize },

    #[error("{candidates} candidates but {lengths} lengths")]
    LengthCountMismatch { candidates: usize, lengths: usize },

    #[error("lengths must be sorted ascending (lengths[{index}] = {value} < {previous})")]
    UnsortedLengths {
        index: usize,
        previous: usize,
        value: usize,
    },

    #[error("length tolerance must be in [0, 1], got {0}")]
    InvalidTolerance(f64),

    #[error("gully must be in [0, 1), got {0}")]
    InvalidGully(f64),

    #[error("query length must be finite and non-negative, got {0}")]
    InvalidQueryLength(f64),

    #[error("bit width must be in 1..={max}, got {bits}")]
    InvalidBitWidth { bits: u32, max: u32 },

    #[error(
        "symbol {value} at position {position} of {} does not fit a {bits}-bit popcount table",
        .candidate.map_or_else(|| "the query".to_string(), |i| format!("candidate {i}"))
    )]
    SymbolOutOfRange {
        /// `None` for the query.
        candidate: Option<usize>,
        position: usize,
        value: u16,
        bits: u32,
    },

    #[error("cumulative cost overflowed at cell ({row}, {col}) with penalty {penalty}")]
    CostOverflow { row: usize, col: usize, penalty: u32 },
}

pub type Result<T> = std::result::Result<T, MatchError>;
