//! # Symbol Encoding
//!
//! Hash codes travel through the matcher as packed `u16` symbols. Some
//! callers (feature inspection, learned hash functions) want them as one
//! boolean per bit instead. This module converts between the two forms.
//!
//! ```text
//!   symbol 0b0000_0000_0000_0110
//!   bits   [false, true, true, false, ..., false]   (bit 0 first)
//! ```

use crate::defaults::SYMBOL_BITS;
use crate::error::{MatchError, Result};

/// A fixed-width hash code; interpreted bitwise, no value is privileged.
pub type Symbol = u16;

/// Bit-vector form of one symbol, least significant bit first.
pub type SymbolBits = [bool; SYMBOL_BITS as usize];

/// Expand each symbol into its bit vector.
///
/// Column `i` of row `n` is bit `i` of `symbols[n]`.
pub fn symbols_to_bits(symbols: &[Symbol]) -> Vec<SymbolBits> {
    symbols
        .iter()
        .map(|&s| {
            let mut bits = [false; SYMBOL_BITS as usize];
            for (i, bit) in bits.iter_mut().enumerate() {
                *bit = (s >> i) & 1 == 1;
            }
            bits
        })
        .collect()
}

/// Pack bit vectors back into symbols.
///
/// Rows may be narrower than `SYMBOL_BITS` (missing high bits are zero) but
/// not wider.
pub fn bits_to_symbols<R: AsRef<[bool]>>(rows: &[R]) -> Result<Vec<Symbol>> {
    rows.iter()
        .map(|row| {
            let row = row.as_ref();
            if row.len() > SYMBOL_BITS as usize {
                return Err(MatchError::InvalidBitWidth {
                    bits: row.len() as u32,
                    max: SYMBOL_BITS,
                });
            }
            Ok(row
                .iter()
                .enumerate()
                .fold(0 as Symbol, |acc, (i, &bit)| acc | ((bit as Symbol) << i)))
        })
        .collect()
}
