//! Core reusable components for sequence matching.
//!
//! This module contains the building blocks that are agnostic to how the
//! candidate database is stored: bit tables, distance matrices, the DTW
//! kernel and the envelope bound. Pipelines compose them.

pub mod alignment;
pub mod bound;
pub mod compute;
