//! Bit population count lookup table.
//!
//! Every distance in the crate is `popcount(a ^ b)` for two symbols. The
//! table trades 64 KiB (for 16-bit symbols) for a single indexed load per
//! cell, which is what the distance fill and the Keogh bound do in their
//! inner loops.
//!
//! The process-wide table is built lazily on first use and is immutable
//! afterwards, so it can be shared by reference across threads without
//! locking.

use crate::core::compute::encoding::Symbol;
use crate::defaults::SYMBOL_BITS;
use crate::error::{MatchError, Result};

// Global 16-bit table (initialized once)
lazy_static::lazy_static! {
    static ref GLOBAL_TABLE: PopcountTable = PopcountTable::build(SYMBOL_BITS);
}

/// Immutable table where `counts[v]` is the number of set bits in `v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopcountTable {
    bits: u32,
    counts: Vec<u8>,
}

impl PopcountTable {
    /// Build a table covering every `bits`-wide unsigned value.
    ///
    /// Uses the recurrence `table[i] = (i & 1) + table[i >> 1]` with
    /// `table[0] = 0`.
    ///
    /// # Panics
    /// If `bits` is outside `1..=SYMBOL_BITS`. Use [`PopcountTable::try_build`]
    /// when the width comes from outside the program.
    pub fn build(bits: u32) -> Self {
        match Self::try_build(bits) {
            Ok(table) => table,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible variant of [`PopcountTable::build`].
    pub fn try_build(bits: u32) -> Result<Self> {
        if bits == 0 || bits > SYMBOL_BITS {
            return Err(MatchError::InvalidBitWidth {
                bits,
                max: SYMBOL_BITS,
            });
        }

        let size = 1usize << bits;
        let mut counts = vec![0u8; size];
        for i in 1..size {
            counts[i] = (i & 1) as u8 + counts[i >> 1];
        }

        Ok(Self { bits, counts })
    }

    /// The process-wide table for `SYMBOL_BITS`-wide symbols.
    #[inline]
    pub fn global() -> &'static PopcountTable {
        &GLOBAL_TABLE
    }

    /// Width of the values this table covers.
    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of entries (`2^bits`).
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Whether `value` is addressable by this table.
    #[inline]
    pub fn covers(&self, value: Symbol) -> bool {
        (value as usize) < self.counts.len()
    }

    /// Set-bit count of `value`.
    ///
    /// `value` must fit in `bits()` bits; the global table covers every
    /// `Symbol`.
    #[inline(always)]
    pub fn count(&self, value: Symbol) -> u8 {
        self.counts[value as usize]
    }

    /// Hamming distance between two symbols.
    #[inline(always)]
    pub fn distance(&self, a: Symbol, b: Symbol) -> u8 {
        self.counts[(a ^ b) as usize]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_table_matches_count_ones() {
        let table = PopcountTable::global();
        assert_eq!(table.bits(), SYMBOL_BITS);
        assert_eq!(table.len(), 1 << SYMBOL_BITS);
        for v in 0..=u16::MAX {
            assert_eq!(table.count(v) as u32, v.count_ones(), "mismatch at {v}");
        }
    }

    #[test]
    fn test_toy_width_table() {
        let table = PopcountTable::build(4);
        assert_eq!(table.len(), 16);
        assert_eq!(table.count(0), 0);
        assert_eq!(table.count(1), 1);
        assert_eq!(table.count(3), 2);
        assert_eq!(table.count(15), 4);
        assert!(table.covers(15));
        assert!(!table.covers(16));
    }

    #[test]
    fn test_distance_is_xor_popcount() {
        let table = PopcountTable::global();
        assert_eq!(table.distance(0b1010, 0b1010), 0);
        assert_eq!(table.distance(0b1010, 0b0101), 4);
        assert_eq!(table.distance(0, u16::MAX), 16);
    }

    #[test]
    fn test_invalid_widths_rejected() {
        assert_eq!(
            PopcountTable::try_build(0),
            Err(MatchError::InvalidBitWidth { bits: 0, max: 16 })
        );
        assert!(PopcountTable::try_build(17).is_err());
    }

    #[test]
    fn test_global_is_shared() {
        let a = PopcountTable::global() as *const PopcountTable;
        let b = PopcountTable::global() as *const PopcountTable;
        assert_eq!(a, b);
    }
}
