//! Inverse-variance weighted averages.

use crate::error::{MeasureError, MeasureResult};
use crate::measurement::Measurement;
use lk_core::Real;

/// Name given to averages unless the caller picks one.
pub const DEFAULT_AVERAGE_NAME: &str = "avg";

/// Data accepted by [`average`].
#[derive(Debug, Clone, Copy)]
pub enum AverageInput<'a> {
    /// Weighted by each measurement's error.
    Measurements(&'a [Measurement]),
    /// Parallel value and error sequences, weighted by the errors.
    Weighted {
        values: &'a [Real],
        errors: &'a [Real],
    },
    /// Plain values: arithmetic mean with zero error.
    Values(&'a [Real]),
}

/// Combine estimates of one quantity.
///
/// `avg = Σ(vᵢ/σᵢ²) / Σ(1/σᵢ²)` with error `sqrt(1 / Σ(1/σᵢ²))`.
pub fn average(input: AverageInput<'_>, name: &str) -> MeasureResult<Measurement> {
    match input {
        AverageInput::Measurements(ms) => {
            let Some(first) = ms.first() else {
                return Err(MeasureError::NoData { what: "average" });
            };
            if ms.iter().any(|m| m.units() != first.units()) {
                tracing::warn!(
                    units = %first.units(),
                    "Taking the average of measurements with different units"
                );
            }
            let (avg, error) = inverse_variance(ms.iter().map(|m| (m.value(), m.error())))?;
            Ok(first.derive(avg, error, name.to_string(), first.units().to_string()))
        }
        AverageInput::Weighted { values, errors } => {
            if values.len() != errors.len() {
                return Err(MeasureError::LengthMismatch {
                    what: "average values and errors",
                    left: values.len(),
                    right: errors.len(),
                });
            }
            if values.is_empty() {
                return Err(MeasureError::NoData { what: "average" });
            }
            let (avg, error) =
                inverse_variance(values.iter().copied().zip(errors.iter().copied()))?;
            Ok(Measurement::new(avg, error).named(name))
        }
        AverageInput::Values(values) => {
            if values.is_empty() {
                return Err(MeasureError::NoData { what: "average" });
            }
            let mean = values.iter().sum::<Real>() / values.len() as Real;
            Ok(Measurement::new(mean, 0.0).named(name))
        }
    }
}

/// Weighted average of measurements, named `avg`.
pub fn weighted_average(measurements: &[Measurement]) -> MeasureResult<Measurement> {
    average(AverageInput::Measurements(measurements), DEFAULT_AVERAGE_NAME)
}

/// Weighted average of raw values with their errors, named `avg`.
pub fn weighted_average_values(values: &[Real], errors: &[Real]) -> MeasureResult<Measurement> {
    average(
        AverageInput::Weighted { values, errors },
        DEFAULT_AVERAGE_NAME,
    )
}

fn inverse_variance(pairs: impl Iterator<Item = (Real, Real)>) -> MeasureResult<(Real, Real)> {
    let mut weighted_sum = 0.0;
    let mut norm = 0.0;
    for (value, error) in pairs {
        if error == 0.0 {
            return Err(MeasureError::Division {
                what: "zero error in weighted average".to_string(),
            });
        }
        let w = 1.0 / (error * error);
        weighted_sum += value * w;
        norm += w;
    }
    Ok((weighted_sum / norm, (1.0 / norm).sqrt()))
}
