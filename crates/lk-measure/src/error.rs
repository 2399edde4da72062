//! Error types for measurement operations.

use thiserror::Error;

/// Result type for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors that can occur while combining or printing measurements.
#[derive(Debug, Error)]
pub enum MeasureError {
    /// Division by a measurement or constant whose value is exactly zero.
    #[error("Tried to divide by zero: {what}")]
    Division { what: String },

    /// An aggregate was asked to work on no data at all.
    #[error("No data given to {what}")]
    NoData { what: &'static str },

    /// Parallel input sequences disagree in length.
    #[error("Length mismatch for {what}: {left} vs {right}")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// Print mode not present in the active configuration.
    #[error("Print mode '{mode}' not configured (available: {})", .available.join(", "))]
    UnknownPrintMode {
        mode: String,
        available: Vec<String>,
    },

    /// Numerical differentiation would need a zero step.
    #[error("Cannot estimate derivative of {what} at zero, supply an analytic derivative")]
    DegenerateStep { what: String },

    /// Print configuration failed validation.
    #[error("Invalid print configuration: {what}")]
    InvalidConfig { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
