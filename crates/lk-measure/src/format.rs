//! Rounding and rendering of measurements.

use crate::config::{DEFAULT_TEMPLATE, MAX_ERROR_DIGITS, TemplateFields, render_template};
use crate::measurement::Measurement;
use lk_core::{Real, decade, round_to_decimals};
use std::fmt;

/// Value and error rounded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundedParts {
    pub value: String,
    pub error: String,
    /// Error expressed in units of the last printed digit of `value`.
    pub error_sig: String,
}

/// Round `value` and `error` for display.
///
/// The error keeps `error_digits` significant digits and the value is rounded
/// to the same decimal place. When the error exceeds the value, both are
/// rounded to the power-of-ten scale of the value instead.
pub fn round_parts(value: Real, error: Real, error_digits: u32) -> RoundedParts {
    let raw = || RoundedParts {
        value: format!("{value}"),
        error: format!("{error}"),
        error_sig: format!("{error}"),
    };
    let (Some(error_decade), true) = (decade(error), value.is_finite()) else {
        return raw();
    };

    let digits = error_digits.clamp(1, MAX_ERROR_DIGITS) as i32;
    let value_scale = decade(value).filter(|_| error.abs() > value.abs());
    let mut decimals = match value_scale {
        Some(value_decade) => -value_decade,
        None => -error_decade + digits - 1,
    };

    let mut e = round_to_decimals(error.abs(), decimals);
    // 0.096 -> 0.10 gains a digit; drop one place so 0.1 is shown
    if value_scale.is_none() && decade(e).is_some_and(|d| d > error_decade) {
        decimals -= 1;
        e = round_to_decimals(error.abs(), decimals);
    }
    let v = clean_zero(round_to_decimals(value, decimals));
    if !v.is_finite() || !e.is_finite() {
        return raw();
    }

    let shown = decimals.max(0);
    let sig = (e * 10f64.powi(shown)).round();

    RoundedParts {
        value: format!("{v:.prec$}", prec = shown as usize),
        error: format!("{e:.prec$}", prec = shown as usize),
        error_sig: format!("{sig:.0}"),
    }
}

fn clean_zero(x: Real) -> Real {
    if x == 0.0 { 0.0 } else { x }
}

impl Measurement {
    /// Render with the measurement's current print mode.
    pub fn render(&self) -> String {
        let template = self
            .config()
            .template(self.print_mode())
            .unwrap_or(DEFAULT_TEMPLATE);
        self.render_template(template)
    }

    /// Render with an explicit template, ignoring the print mode.
    pub fn render_template(&self, template: &str) -> String {
        let parts = round_parts(self.value(), self.error(), self.config().error_digits);
        render_template(
            template,
            &TemplateFields {
                value: &parts.value,
                error: &parts.error,
                error_sig: &parts.error_sig,
                name: self.name(),
                units: self.units(),
            },
        )
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrintConfig;
    use std::sync::Arc;

    #[test]
    fn round_error_driven() {
        let p = round_parts(9.81, 0.05, 1);
        assert_eq!(p.value, "9.81");
        assert_eq!(p.error, "0.05");
        assert_eq!(p.error_sig, "5");
    }

    #[test]
    fn round_two_error_digits() {
        let p = round_parts(9.8123, 0.0512, 2);
        assert_eq!(p.value, "9.812");
        assert_eq!(p.error, "0.051");
        assert_eq!(p.error_sig, "51");
    }

    #[test]
    fn round_large_error_uses_value_scale() {
        let p = round_parts(0.3, 1.24, 1);
        assert_eq!(p.value, "0.3");
        assert_eq!(p.error, "1.2");
        assert_eq!(p.error_sig, "12");
    }

    #[test]
    fn round_to_tens() {
        let p = round_parts(1234.5, 23.0, 1);
        assert_eq!(p.value, "1230");
        assert_eq!(p.error, "20");
        assert_eq!(p.error_sig, "20");
    }

    #[test]
    fn rounding_up_drops_a_decimal() {
        let p = round_parts(9.81, 0.096, 1);
        assert_eq!(p.value, "9.8");
        assert_eq!(p.error, "0.1");
        assert_eq!(p.error_sig, "1");

        let p = round_parts(123.4, 9.6, 1);
        assert_eq!(p.value, "120");
        assert_eq!(p.error, "10");
        assert_eq!(p.error_sig, "10");
    }

    #[test]
    fn rounding_up_with_two_digits() {
        let p = round_parts(2.5, 0.0996, 2);
        assert_eq!(p.value, "2.50");
        assert_eq!(p.error, "0.10");
        assert_eq!(p.error_sig, "10");
    }

    #[test]
    fn rounding_up_around_zero_value() {
        let p = round_parts(0.0, 0.096, 1);
        assert_eq!(p.value, "0.0");
        assert_eq!(p.error, "0.1");
    }

    #[test]
    fn subnormal_error_prints_raw() {
        let p = round_parts(1.0, 1e-320, 1);
        assert_eq!(p.value, "1");
        assert!(!p.error.contains("NaN"));
        assert!(!p.value.contains("NaN"));
    }

    #[test]
    fn huge_digit_count_is_capped() {
        let p = round_parts(9.81, 0.05, u32::MAX);
        assert!(!p.value.contains("NaN"));
        assert!(p.value.starts_with("9.81"));
    }

    #[test]
    fn zero_error_prints_raw_value() {
        let p = round_parts(11.0, 0.0, 1);
        assert_eq!(p.value, "11");
        assert_eq!(p.error, "0");
    }

    #[test]
    fn zero_value_uses_error_scale() {
        let p = round_parts(0.0, 0.1, 1);
        assert_eq!(p.value, "0.0");
        assert_eq!(p.error, "0.1");
    }

    #[test]
    fn display_default_mode() {
        let g = Measurement::new(9.81, 0.05).named("g").with_units("m/s^2");
        assert_eq!(g.to_string(), "9.81 ± 0.05 m/s^2 (g)");
    }

    #[test]
    fn display_si_mode() {
        let g = Measurement::new(9.81, 0.05)
            .named("g")
            .with_units("m/s^2")
            .with_config(Arc::new(PrintConfig::standard()))
            .with_print_mode("latexSI");
        assert_eq!(g.to_string(), "\\SI{9.81(5)}{m/s^2}");
    }
}
