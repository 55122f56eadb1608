//! Sliding-window upper/lower envelopes for LB_Keogh.
//!
//! `upper[i]` is the maximum and `lower[i]` the minimum of `x` over the
//! window `[i - radius, i + radius]`. The window is clipped at both ends of
//! the sequence. For max/min this gives the same result as reflecting the
//! sequence at its edges, since the reflected samples are already inside
//! the clipped window. A radius at least as long as the sequence makes
//! every position see the whole sequence.

use std::collections::VecDeque;

use crate::core::compute::encoding::Symbol;
use crate::core::compute::popcount::PopcountTable;

/// Upper and lower envelope of one sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub upper: Vec<Symbol>,
    pub lower: Vec<Symbol>,
}

impl Envelope {
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }

    /// Keogh bound of `y` against this envelope.
    ///
    /// Unchecked counterpart of [`crate::core::bound::keogh::keogh_bound`];
    /// returns 0.0 when either side is empty.
    #[inline]
    pub fn lower_bound(&self, y: &[Symbol], table: &PopcountTable) -> f64 {
        crate::core::bound::keogh::bound_unchecked(&self.upper, &self.lower, y, table)
    }
}

/// Compute the envelope of `x` for the given radius.
pub fn compute_envelope(x: &[Symbol], radius: usize) -> Envelope {
    Envelope {
        upper: sliding_extreme(x, radius, |incoming, kept| incoming >= kept),
        lower: sliding_extreme(x, radius, |incoming, kept| incoming <= kept),
    }
}

/// Windowed extreme with a monotonic deque of indices.
///
/// `dominates(a, b)` is true when `a` makes `b` useless as a future extreme
/// (`>=` for max, `<=` for min).
fn sliding_extreme<F>(x: &[Symbol], radius: usize, dominates: F) -> Vec<Symbol>
where
    F: Fn(Symbol, Symbol) -> bool,
{
    let n = x.len();
    let mut out = Vec::with_capacity(n);
    let mut window: VecDeque<usize> = VecDeque::with_capacity(radius.saturating_mul(2).saturating_add(1).min(n));
    let mut next = 0usize;

    for i in 0..n {
        // Admit everything up to i + radius.
        let hi = i.saturating_add(radius).min(n - 1);
        while next <= hi {
            while let Some(&back) = window.back() {
                if dominates(x[next], x[back]) {
                    window.pop_back();
                } else {
                    break;
                }
            }
            window.push_back(next);
            next += 1;
        }
        // Evict what fell below i - radius.
        let lo = i.saturating_sub(radius);
        while let Some(&front) = window.front() {
            if front < lo {
                window.pop_front();
            } else {
                break;
            }
        }
        if let Some(&front) = window.front() {
            out.push(x[front]);
        }
    }
    out
}
