//! The [`Measurement`] value type.

use crate::config::{DEFAULT_MODE, PrintConfig};
use crate::error::{MeasureError, MeasureResult};
use lk_core::Real;
use std::sync::Arc;

/// Label given to measurements constructed without a name.
pub const DEFAULT_NAME: &str = "Measurement";

/// Unit label given to measurements constructed without units.
pub const DEFAULT_UNITS: &str = "arb";

/// A value with a one-sigma uncertainty and display labels.
///
/// Arithmetic never mutates an operand; every operator returns a new
/// `Measurement`. Errors are assumed uncorrelated, so `a - a` has error
/// `sqrt(2) * a.error()` rather than zero.
///
/// ```
/// use lk_measure::Measurement;
///
/// let a = Measurement::new(10.0, 0.3).named("a").with_units("m");
/// let b = Measurement::new(4.0, 0.4).named("b").with_units("m");
/// let c = &a + &b;
/// assert_eq!(c.value(), 14.0);
/// assert!((c.error() - 0.5).abs() < 1e-12);
/// assert_eq!(c.name(), "a+b");
/// ```
#[derive(Debug, Clone)]
pub struct Measurement {
    value: Real,
    error: Real,
    name: String,
    units: String,
    print_mode: String,
    config: Arc<PrintConfig>,
}

impl Measurement {
    /// Create a measurement with default labels and the built-in print configuration.
    pub fn new(value: Real, error: Real) -> Self {
        Self {
            value,
            error,
            name: DEFAULT_NAME.to_string(),
            units: DEFAULT_UNITS.to_string(),
            print_mode: DEFAULT_MODE.to_string(),
            config: PrintConfig::builtin(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Attach a print configuration.
    ///
    /// If the current mode is not part of `config`, falls back to `default`.
    pub fn with_config(mut self, config: Arc<PrintConfig>) -> Self {
        self.config = config;
        if !self.config.has_mode(&self.print_mode) {
            tracing::warn!(
                mode = %self.print_mode,
                "print mode not in configuration, using default"
            );
            self.print_mode = DEFAULT_MODE.to_string();
        }
        self
    }

    /// Select a print mode, falling back to `default` with a warning if unknown.
    pub fn with_print_mode(mut self, mode: &str) -> Self {
        if self.config.has_mode(mode) {
            self.print_mode = mode.to_string();
        } else {
            tracing::warn!(
                mode,
                available = ?self.config.mode_names(),
                "given print mode not configured, setting to default"
            );
            self.print_mode = DEFAULT_MODE.to_string();
        }
        self
    }

    /// Change the print mode in place.
    ///
    /// Unlike [`Measurement::with_print_mode`] an unknown mode is an error and
    /// the current mode is kept.
    pub fn set_print_mode(&mut self, mode: &str) -> MeasureResult<()> {
        if !self.config.has_mode(mode) {
            return Err(MeasureError::UnknownPrintMode {
                mode: mode.to_string(),
                available: self.config.mode_names(),
            });
        }
        self.print_mode = mode.to_string();
        Ok(())
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn error(&self) -> Real {
        self.error
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn print_mode(&self) -> &str {
        &self.print_mode
    }

    pub fn config(&self) -> &Arc<PrintConfig> {
        &self.config
    }

    /// `error / |value|`, infinite for a zero value.
    pub fn relative_error(&self) -> Real {
        self.error / self.value.abs()
    }

    /// New measurement carrying this one's print settings.
    pub(crate) fn derive(
        &self,
        value: Real,
        error: Real,
        name: String,
        units: String,
    ) -> Measurement {
        Measurement {
            value,
            error,
            name,
            units,
            print_mode: self.print_mode.clone(),
            config: Arc::clone(&self.config),
        }
    }
}
