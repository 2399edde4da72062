//! Curve fitting for labkit.
//!
//! Weighted nonlinear least squares over built-in models (line, polynomial,
//! Gaussian) or user closures. Errors on the independent variable are folded
//! into the weights with the effective variance method. Fitted parameters
//! come back as [`lk_measure::Measurement`] values so they can feed straight
//! into further error propagation.

pub mod error;
pub mod fit;
pub mod jacobian;
pub mod lm;
pub mod model;

pub use error::{FitError, FitResult};
pub use fit::{FitConfig, FitData, FitOutcome, fit_data};
pub use lm::{LmConfig, LmResult};
pub use model::{CustomModel, Model};
