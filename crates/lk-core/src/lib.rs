//! lk-core: shared numeric foundation for labkit.
//!
//! `Real` plus the float helpers used by error propagation (finite-difference
//! steps), display rounding (decades, decimal places) and fitting.

pub mod numeric;

pub use numeric::*;
