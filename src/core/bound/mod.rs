//! Keogh lower bounding: query envelopes and the bound used to skip
//! alignments that are unlikely to beat the current best score.

pub mod envelope;
pub mod keogh;
