//! Spectral index computation
//!
//! Per-cell normalized differences between two co-registered bands.

mod indices;

pub use indices::{ndvi, normalized_difference, normalized_difference_value};
