//! Error types for curve fitting.

use thiserror::Error;

/// Errors that can occur while fitting a model to data.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("The string '{name}' doesn't match a built in model")]
    InvalidModel { name: String },

    #[error("A guess is required when x errors are given")]
    GuessRequired,

    #[error("Not enough data: {points} points for {params} parameters")]
    InsufficientData { points: usize, params: usize },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Normal matrix is singular")]
    Singular,

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type FitResult<T> = Result<T, FitError>;
