// src/match_opt.rs
//
// Matching options: length filter, envelope radius, DTW shape and the
// execution mode of the candidate loop.

use crate::core::alignment::matrix::Cost;
use crate::defaults;
use crate::error::{MatchError, Result};

/// How the candidate loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    /// Ascending candidate order on the calling thread.
    #[default]
    Sequential,
    /// Candidates fanned out over the rayon pool.
    Parallel { pruning: ParallelPruning },
}

/// Keogh pruning policy for parallel execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParallelPruning {
    /// No pruning: every in-tolerance candidate is scored. Deterministic.
    #[default]
    Disabled,
    /// Workers share a monotonically decreasing best score. Faster, but the
    /// set of scored candidates depends on scheduling.
    Shared,
}

/// Matching options
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOpt {
    // Filtering parameters
    pub length_tolerance: f64, // Candidate length must be within +/- this fraction of the query length
    pub radius: usize,         // Keogh envelope half-width

    // Alignment parameters
    pub gully: f64,     // Path must reach this fraction of the shorter sequence
    pub penalty: Cost,  // Non-diagonal move penalty

    // Processing parameters
    pub execution: Execution,
}

// ============================================================================
// STAGE-SPECIFIC PARAMETER BUNDLES
// ============================================================================

/// Parameters for the candidate filter stage (length window + Keogh gate)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub length_tolerance: f64,
    pub radius: usize,
}

/// Parameters for the DTW stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DtwParams {
    pub gully: f64,
    pub penalty: Cost,
}

impl Default for MatchOpt {
    fn default() -> Self {
        MatchOpt {
            length_tolerance: defaults::LENGTH_TOLERANCE,
            radius: defaults::RADIUS,
            gully: defaults::GULLY,
            penalty: defaults::PENALTY,
            execution: Execution::Sequential,
        }
    }
}

impl MatchOpt {
    pub fn with_length_tolerance(mut self, length_tolerance: f64) -> Self {
        self.length_tolerance = length_tolerance;
        self
    }

    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_gully(mut self, gully: f64) -> Self {
        self.gully = gully;
        self
    }

    pub fn with_penalty(mut self, penalty: Cost) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    /// Get filter-stage parameters as a bundle
    pub fn filter_params(&self) -> FilterParams {
        FilterParams {
            length_tolerance: self.length_tolerance,
            radius: self.radius,
        }
    }

    /// Get DTW-stage parameters as a bundle
    pub fn dtw_params(&self) -> DtwParams {
        DtwParams {
            gully: self.gully,
            penalty: self.penalty,
        }
    }

    /// Check ranges. Called at the top of every match.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.length_tolerance) {
            return Err(MatchError::InvalidTolerance(self.length_tolerance));
        }
        if !(0.0..1.0).contains(&self.gully) {
            return Err(MatchError::InvalidGully(self.gully));
        }
        Ok(())
    }
}
