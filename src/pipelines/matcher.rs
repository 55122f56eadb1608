//! Query-to-candidates matching pipeline.
//!
//! Steps:
//! 1. Restrict the length-sorted candidate list to the lengths within
//!    `length_tolerance` of the query length (two binary searches).
//! 2. Compute the query envelope once.
//! 3. For each candidate in the window, in ascending index order, compare
//!    its Keogh bound with the best score so far. A candidate whose bound is
//!    not below the best is skipped and does not appear in the output.
//!    Otherwise the distance matrix is built, relaxed by DTW and the score
//!    recorded, even when it does not improve the best.
//! 4. Stable sort by ascending score.
//!
//! Skipping on the bound trades completeness for speed: a skipped candidate
//! has no score at all. `Execution::Parallel { pruning: Disabled }` scores
//! every candidate in the window when completeness matters.

use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::core::alignment::dtw::max_safe_penalty;
use crate::core::alignment::workspace::with_workspace;
use crate::core::bound::envelope::{Envelope, compute_envelope};
use crate::core::compute::encoding::Symbol;
use crate::core::compute::popcount::PopcountTable;
use crate::defaults::SYMBOL_BITS;
use crate::error::{MatchError, Result};
use crate::match_opt::{Execution, MatchOpt, ParallelPruning};

/// One scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    /// Index into the candidate list.
    pub index: usize,
    /// Path-length normalized DTW cost; lower is better. `f64::INFINITY`
    /// when the best border cell has no moves (gully 0 corners, 1x1).
    pub score: f64,
}

/// Matcher bound to a set of options and a popcount table.
#[derive(Debug, Clone)]
pub struct SequenceMatcher<'t> {
    opt: MatchOpt,
    table: &'t PopcountTable,
}

impl SequenceMatcher<'static> {
    /// Matcher using the process-wide 16-bit table.
    pub fn new(opt: MatchOpt) -> Result<Self> {
        Self::with_table(opt, PopcountTable::global())
    }
}

impl<'t> SequenceMatcher<'t> {
    /// Matcher using a caller-provided table. [`SequenceMatcher::run`]
    /// rejects symbols wider than the table with
    /// [`MatchError::SymbolOutOfRange`].
    pub fn with_table(opt: MatchOpt, table: &'t PopcountTable) -> Result<Self> {
        opt.validate()?;
        Ok(Self { opt, table })
    }

    pub fn opt(&self) -> &MatchOpt {
        &self.opt
    }

    /// Rank `candidates` against `query`.
    ///
    /// `lengths[n]` is the length of `candidates[n]` in the same unit as
    /// `query_length` and must be sorted ascending.
    pub fn run<S>(
        &self,
        query: &[Symbol],
        query_length: f64,
        candidates: &[S],
        lengths: &[usize],
    ) -> Result<Vec<MatchResult>>
    where
        S: AsRef<[Symbol]> + Sync,
    {
        let window = self.validate_inputs(query, query_length, candidates, lengths)?;
        log::debug!(
            "match_sequence: query len {}, window [{}, {}) of {} candidates",
            query.len(),
            window.start,
            window.end,
            candidates.len()
        );
        if window.is_empty() {
            return Ok(Vec::new());
        }

        self.warn_on_overflow_risk(query, candidates, &window);

        let envelope = compute_envelope(query, self.opt.radius);
        let mut results = match self.opt.execution {
            Execution::Sequential => self.run_sequential(query, &envelope, candidates, window)?,
            Execution::Parallel {
                pruning: ParallelPruning::Disabled,
            } => self.run_parallel_exhaustive(query, candidates, window)?,
            Execution::Parallel {
                pruning: ParallelPruning::Shared,
            } => self.run_parallel_shared(query, &envelope, candidates, window)?,
        };

        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        Ok(results)
    }

    fn validate_inputs<S: AsRef<[Symbol]>>(
        &self,
        query: &[Symbol],
        query_length: f64,
        candidates: &[S],
        lengths: &[usize],
    ) -> Result<Range<usize>> {
        if query.is_empty() {
            return Err(MatchError::EmptySequence { what: "query" });
        }
        if !query_length.is_finite() || query_length < 0.0 {
            return Err(MatchError::InvalidQueryLength(query_length));
        }
        if candidates.len() != lengths.len() {
            return Err(MatchError::LengthCountMismatch {
                candidates: candidates.len(),
                lengths: lengths.len(),
            });
        }
        if let Some(index) = lengths.windows(2).position(|w| w[1] < w[0]) {
            return Err(MatchError::UnsortedLengths {
                index: index + 1,
                previous: lengths[index],
                value: lengths[index + 1],
            });
        }

        let window = length_window(lengths, query_length, self.opt.length_tolerance);
        if let Some(offset) = candidates[window.clone()]
            .iter()
            .position(|c| c.as_ref().is_empty())
        {
            return Err(MatchError::EmptyCandidate {
                index: window.start + offset,
            });
        }

        if self.table.bits() < SYMBOL_BITS {
            self.check_symbols(query, None)?;
            for n in window.clone() {
                self.check_symbols(candidates[n].as_ref(), Some(n))?;
            }
        }
        Ok(window)
    }

    /// Every symbol must index the popcount table.
    fn check_symbols(&self, symbols: &[Symbol], candidate: Option<usize>) -> Result<()> {
        match symbols.iter().position(|&s| !self.table.covers(s)) {
            Some(position) => Err(MatchError::SymbolOutOfRange {
                candidate,
                position,
                value: symbols[position],
                bits: self.table.bits(),
            }),
            None => Ok(()),
        }
    }

    fn warn_on_overflow_risk<S: AsRef<[Symbol]>>(
        &self,
        query: &[Symbol],
        candidates: &[S],
        window: &Range<usize>,
    ) {
        let longest = candidates[window.clone()]
            .iter()
            .map(|c| c.as_ref().len())
            .max()
            .unwrap_or(0);
        let safe = max_safe_penalty(query.len(), longest);
        if safe.is_none_or(|limit| self.opt.penalty > limit) {
            log::warn!(
                "match_sequence: penalty {} may overflow cumulative costs for a {}x{} alignment (safe limit {:?})",
                self.opt.penalty,
                query.len(),
                longest,
                safe
            );
        }
    }

    fn run_sequential<S: AsRef<[Symbol]>>(
        &self,
        query: &[Symbol],
        envelope: &Envelope,
        candidates: &[S],
        window: Range<usize>,
    ) -> Result<Vec<MatchResult>> {
        let dtw = self.opt.dtw_params();
        let mut results = Vec::new();
        let mut best_so_far = f64::INFINITY;
        let mut pruned = 0usize;

        with_workspace(|ws| -> Result<()> {
            for n in window {
                let candidate = candidates[n].as_ref();
                let bound = envelope.lower_bound(candidate, self.table);
                if bound >= best_so_far {
                    log::trace!("  candidate {n}: pruned (bound {bound:.4} >= best {best_so_far:.4})");
                    pruned += 1;
                    continue;
                }

                let score = ws.align(query, candidate, self.table, dtw.gully, dtw.penalty)?;
                log::trace!("  candidate {n}: bound {bound:.4}, score {score:.4}");
                results.push(MatchResult { index: n, score });
                if score < best_so_far {
                    best_so_far = score;
                }
            }
            Ok(())
        })?;

        log::debug!(
            "match_sequence: scored {}, pruned {}, best {:.4}",
            results.len(),
            pruned,
            best_so_far
        );
        Ok(results)
    }

    fn run_parallel_exhaustive<S: AsRef<[Symbol]> + Sync>(
        &self,
        query: &[Symbol],
        candidates: &[S],
        window: Range<usize>,
    ) -> Result<Vec<MatchResult>> {
        let dtw = self.opt.dtw_params();
        let results = window
            .into_par_iter()
            .map(|n| {
                with_workspace(|ws| ws.align(query, candidates[n].as_ref(), self.table, dtw.gully, dtw.penalty))
                    .map(|score| MatchResult { index: n, score })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("match_sequence: scored {} (parallel, no pruning)", results.len());
        Ok(results)
    }

    fn run_parallel_shared<S: AsRef<[Symbol]> + Sync>(
        &self,
        query: &[Symbol],
        envelope: &Envelope,
        candidates: &[S],
        window: Range<usize>,
    ) -> Result<Vec<MatchResult>> {
        let dtw = self.opt.dtw_params();
        let total = window.len();
        // Scores are non-negative and never NaN (+inf at worst), so their
        // bit patterns order like the values and fetch_min on the bits is a
        // float minimum.
        let best_so_far = AtomicU64::new(f64::INFINITY.to_bits());

        let results = window
            .into_par_iter()
            .filter_map(|n| {
                let candidate = candidates[n].as_ref();
                let bound = envelope.lower_bound(candidate, self.table);
                if bound >= f64::from_bits(best_so_far.load(Ordering::Relaxed)) {
                    return None;
                }
                let scored = with_workspace(|ws| ws.align(query, candidate, self.table, dtw.gully, dtw.penalty))
                    .map(|score| {
                        best_so_far.fetch_min(score.to_bits(), Ordering::Relaxed);
                        MatchResult { index: n, score }
                    });
                Some(scored)
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "match_sequence: scored {}, pruned {} (parallel, shared bound)",
            results.len(),
            total - results.len()
        );
        Ok(results)
    }
}

/// Rank `candidates` against `query` with the process-wide popcount table.
///
/// See [`SequenceMatcher::run`].
pub fn match_sequence<S>(
    query: &[Symbol],
    query_length: f64,
    candidates: &[S],
    lengths: &[usize],
    opt: &MatchOpt,
) -> Result<Vec<MatchResult>>
where
    S: AsRef<[Symbol]> + Sync,
{
    SequenceMatcher::new(opt.clone())?.run(query, query_length, candidates, lengths)
}

/// Index range of `lengths` (sorted ascending) that lies within
/// `[(1 - tolerance) * query_length, (1 + tolerance) * query_length]`.
pub fn length_window(lengths: &[usize], query_length: f64, tolerance: f64) -> Range<usize> {
    let lower = (1.0 - tolerance) * query_length;
    let upper = (1.0 + tolerance) * query_length;
    let start = lengths.partition_point(|&len| (len as f64) < lower);
    let end = lengths.partition_point(|&len| (len as f64) <= upper);
    start..end.max(start)
}
