//! Nevformance numeric primitives.

pub mod bucket;
pub mod correlation;
pub mod stats;

pub use bucket::*;
pub use correlation::*;
pub use stats::*;
