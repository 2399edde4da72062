//! Measurements with uncertainties.
//!
//! A [`Measurement`] carries a value, a one-sigma error, and display labels.
//! Arithmetic, [`average`] and [`function`] propagate the error with the
//! first-order Gaussian formulas, assuming all inputs are uncorrelated.
//!
//! # Modules
//!
//! - `measurement`: the value type and its print-mode handling
//! - `ops`: operator overloads (`+ - * /`, negation, powers)
//! - `average`: inverse-variance weighted averages
//! - `function`: applying scalar functions, with analytic or numeric derivatives
//! - `config` / `format`: injected print templates and display rounding
//!
//! ```
//! use lk_measure::{Measurement, function};
//!
//! let y0 = Measurement::new(3.0, 0.01).named("height").with_units("m");
//! let t = Measurement::new(0.78, 0.05).named("time").with_units("s");
//! let g = (2.0 * &y0 / t.powf(2.0)).unwrap();
//! assert!((g.value() - 6.0 / 0.78f64.powi(2)).abs() < 1e-12);
//!
//! let s = function::sin(&Measurement::new(0.0, 0.1));
//! assert!((s.error() - 0.1).abs() < 1e-15);
//! ```

pub mod average;
pub mod config;
pub mod error;
pub mod format;
pub mod function;
pub mod measurement;
pub mod ops;

pub use average::{AverageInput, average, weighted_average, weighted_average_values};
pub use config::{DEFAULT_MODE, DEFAULT_TEMPLATE, MAX_ERROR_DIGITS, PrintConfig};
pub use error::{MeasureError, MeasureResult};
pub use format::{RoundedParts, round_parts};
pub use function::{UncertainFn, apply_fn};
pub use measurement::{DEFAULT_NAME, DEFAULT_UNITS, Measurement};
