//! Alignment kernels - pairwise bit distance and penalized DTW.
//!
//! These modules provide the computational heart of the matcher and are
//! agnostic to where candidates come from.

pub mod distance;
pub mod dtw;
pub mod matrix;
pub mod workspace; // Thread-local matrix buffers for allocation reuse
