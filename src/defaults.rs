// src/defaults.rs

// Symbol Constants
pub const SYMBOL_BITS: u32 = 16;

// Filtering Constants
pub const LENGTH_TOLERANCE: f64 = 0.1;
pub const RADIUS: usize = 1;

// Alignment Constants
pub const GULLY: f64 = 0.95;
pub const PENALTY: u32 = 1;
