//! Matching pipelines.
//!
//! Each pipeline implements a complete query-to-candidates workflow:
//! - `matcher`: length-filtered, Keogh-pruned DTW ranking of one query

pub mod matcher;
