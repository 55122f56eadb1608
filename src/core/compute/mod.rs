//! Symbol-level compute primitives: popcount lookup and bit-vector encoding.

pub mod encoding;
pub mod popcount;
