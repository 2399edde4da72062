use lk_fit::FitError;
use lk_measure::MeasureError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Measurement error: {0}")]
    Measure(#[from] MeasureError),

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },
}
