//! Applying scalar functions to measurements.
//!
//! Uncertainty goes through as `σ_out = |f'(v)| σ_in`. An [`UncertainFn`]
//! pairs the evaluator with an optional analytic derivative; without one the
//! derivative is estimated by central differences with step `sqrt(eps) * v`.
//! That step vanishes at `v == 0`, which is reported as
//! [`MeasureError::DegenerateStep`].

use crate::error::{MeasureError, MeasureResult};
use crate::measurement::{DEFAULT_UNITS, Measurement};
use lk_core::{Real, central_difference, difference_step};
use std::f64::consts::E;

type ScalarFn = Box<dyn Fn(Real) -> Real + Send + Sync>;

/// A scalar function with an optional analytic derivative.
pub struct UncertainFn {
    name: String,
    eval: ScalarFn,
    derivative: Option<ScalarFn>,
}

impl UncertainFn {
    pub fn new(eval: impl Fn(Real) -> Real + Send + Sync + 'static) -> Self {
        Self {
            name: "f".to_string(),
            eval: Box::new(eval),
            derivative: None,
        }
    }

    /// Name used in result labels, `name(m)`.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_derivative(mut self, df: impl Fn(Real) -> Real + Send + Sync + 'static) -> Self {
        self.derivative = Some(Box::new(df));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, x: Real) -> Real {
        (self.eval)(x)
    }

    /// Analytic derivative if present, otherwise a central difference estimate.
    pub fn derivative_at(&self, x: Real) -> MeasureResult<Real> {
        slope_at(&*self.eval, self.derivative.as_deref(), x, &self.name)
    }

    /// Apply to `m`, labelling the result with arbitrary units.
    pub fn apply(&self, m: &Measurement) -> MeasureResult<Measurement> {
        self.apply_with_units(m, DEFAULT_UNITS)
    }

    pub fn apply_with_units(&self, m: &Measurement, units: &str) -> MeasureResult<Measurement> {
        let slope = self.derivative_at(m.value())?;
        Ok(propagate(m, &self.name, self.eval(m.value()), slope, units))
    }
}

impl std::fmt::Debug for UncertainFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UncertainFn")
            .field("name", &self.name)
            .field("analytic_derivative", &self.derivative.is_some())
            .finish()
    }
}

/// Apply `f` (and `df`, when known) to `m`.
///
/// Shorthand for building an [`UncertainFn`] once; `units` defaults to `arb`
/// and `fname` to `f`.
pub fn apply_fn<F>(
    m: &Measurement,
    f: F,
    df: Option<&dyn Fn(Real) -> Real>,
    units: Option<&str>,
    fname: Option<&str>,
) -> MeasureResult<Measurement>
where
    F: Fn(Real) -> Real,
{
    let fname = fname.unwrap_or("f");
    let x = m.value();
    let slope = slope_at(&f, df, x, fname)?;
    Ok(propagate(
        m,
        fname,
        f(x),
        slope,
        units.unwrap_or(DEFAULT_UNITS),
    ))
}

fn slope_at<F, D>(f: &F, df: Option<&D>, x: Real, fname: &str) -> MeasureResult<Real>
where
    F: Fn(Real) -> Real + ?Sized,
    D: Fn(Real) -> Real + ?Sized,
{
    if let Some(df) = df {
        return Ok(df(x));
    }
    central_difference(f, x, difference_step(x)).ok_or_else(|| MeasureError::DegenerateStep {
        what: fname.to_string(),
    })
}

fn propagate(m: &Measurement, fname: &str, value: Real, slope: Real, units: &str) -> Measurement {
    m.derive(
        value,
        (slope * m.error()).abs(),
        format!("{fname}({})", m.name()),
        units.to_string(),
    )
}

pub fn sin(m: &Measurement) -> Measurement {
    let x = m.value();
    propagate(m, "sin", x.sin(), x.cos(), DEFAULT_UNITS)
}

pub fn cos(m: &Measurement) -> Measurement {
    let x = m.value();
    propagate(m, "cos", x.cos(), -x.sin(), DEFAULT_UNITS)
}

pub fn tan(m: &Measurement) -> Measurement {
    let x = m.value();
    let c = x.cos();
    propagate(m, "tan", x.tan(), 1.0 / (c * c), DEFAULT_UNITS)
}

pub fn exp(m: &Measurement) -> Measurement {
    let y = m.value().exp();
    propagate(m, "exp", y, y, DEFAULT_UNITS)
}

/// Natural logarithm.
pub fn ln(m: &Measurement) -> Measurement {
    let x = m.value();
    propagate(m, "ln", x.ln(), 1.0 / x, DEFAULT_UNITS)
}

/// Logarithm in `base`; `base == e` is labelled `ln`.
pub fn log(m: &Measurement, base: Real) -> Measurement {
    if base == E {
        return ln(m);
    }
    let x = m.value();
    let ln_base = base.ln();
    propagate(
        m,
        &format!("log_{base}"),
        x.ln() / ln_base,
        1.0 / (x * ln_base),
        DEFAULT_UNITS,
    )
}

/// `m^p` as a function application, labelled `pow_p(m)` with arbitrary units.
///
/// [`Measurement::powf`] is the operator form that keeps unit labels.
pub fn pow(m: &Measurement, p: Real) -> Measurement {
    let x = m.value();
    propagate(
        m,
        &format!("pow_{p}"),
        x.powf(p),
        p * x.powf(p - 1.0),
        DEFAULT_UNITS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Real, b: Real, tol: Real) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn sin_at_zero() {
        let s = sin(&Measurement::new(0.0, 0.1).named("theta"));
        assert_eq!(s.value(), 0.0);
        assert!(close(s.error(), 0.1, 1e-15));
        assert_eq!(s.name(), "sin(theta)");
        assert_eq!(s.units(), DEFAULT_UNITS);
    }

    #[test]
    fn cos_error_is_positive() {
        let c = cos(&Measurement::new(1.0, 0.1));
        assert!(close(c.value(), 1f64.cos(), 1e-15));
        assert!(close(c.error(), 1f64.sin() * 0.1, 1e-15));
    }

    #[test]
    fn tan_uses_secant_squared() {
        let t = tan(&Measurement::new(0.5, 0.01));
        let c = 0.5f64.cos();
        assert!(close(t.error(), 0.01 / (c * c), 1e-15));
    }

    #[test]
    fn exp_and_ln() {
        let e = exp(&Measurement::new(1.0, 0.1));
        assert!(close(e.value(), E, 1e-15));
        assert!(close(e.error(), E * 0.1, 1e-15));

        let l = ln(&Measurement::new(2.0, 0.1));
        assert!(close(l.error(), 0.05, 1e-15));
        assert_eq!(l.name(), "ln(Measurement)");
    }

    #[test]
    fn log_base_ten_is_analytic() {
        let l = log(&Measurement::new(100.0, 1.0).named("x"), 10.0);
        assert!(close(l.value(), 2.0, 1e-12));
        assert!(close(l.error(), 1.0 / (100.0 * 10f64.ln()), 1e-15));
        assert_eq!(l.name(), "log_10(x)");
    }

    #[test]
    fn log_base_e_is_ln() {
        let l = log(&Measurement::new(2.0, 0.1), E);
        assert!(l.name().starts_with("ln("));
    }

    #[test]
    fn pow_wrapper() {
        let p = pow(&Measurement::new(4.0, 0.2), 2.0);
        assert!(close(p.value(), 16.0, 1e-12));
        assert!(close(p.error(), 1.6, 1e-12));
        assert_eq!(p.name(), "pow_2(Measurement)");
    }

    #[test]
    fn numeric_derivative_matches_analytic() {
        let f = UncertainFn::new(|x| x * x * x).named("cube");
        let r = f.apply(&Measurement::new(2.0, 0.1)).unwrap();
        assert!(close(r.value(), 8.0, 1e-12));
        assert!(close(r.error(), 12.0 * 0.1, 1e-6));
        assert_eq!(r.name(), "cube(Measurement)");
    }

    #[test]
    fn numeric_derivative_at_zero_is_rejected() {
        let f = UncertainFn::new(f64::sin);
        let err = f.apply(&Measurement::new(0.0, 0.1)).unwrap_err();
        assert!(matches!(err, MeasureError::DegenerateStep { .. }));

        let g = UncertainFn::new(f64::sin).with_derivative(f64::cos);
        let r = g.apply(&Measurement::new(0.0, 0.1)).unwrap();
        assert!(close(r.error(), 0.1, 1e-15));
    }

    #[test]
    fn apply_fn_matches_uncertain_fn() {
        let m = Measurement::new(1.3, 0.05).named("x");
        let via_fn = apply_fn(&m, |x| x.exp() * x, None, None, Some("g")).unwrap();
        let via_type = UncertainFn::new(|x: Real| x.exp() * x)
            .named("g")
            .apply(&m)
            .unwrap();
        assert_eq!(via_fn.value(), via_type.value());
        assert_eq!(via_fn.error(), via_type.error());
        assert_eq!(via_fn.name(), via_type.name());

        let err = apply_fn(&Measurement::new(0.0, 0.1), f64::sin, None, None, None).unwrap_err();
        assert!(matches!(err, MeasureError::DegenerateStep { .. }));

        let cos: &dyn Fn(Real) -> Real = &f64::cos;
        let r = apply_fn(&Measurement::new(0.0, 0.1), f64::sin, Some(cos), None, None).unwrap();
        assert!(close(r.error(), 0.1, 1e-15));
    }

    #[test]
    fn apply_fn_with_units_and_name() {
        let m = Measurement::new(3.0, 0.2).named("r");
        let area = apply_fn(&m, |r| std::f64::consts::PI * r * r, None, Some("m^2"), Some("area"))
            .unwrap();
        assert_eq!(area.units(), "m^2");
        assert_eq!(area.name(), "area(r)");
        assert!(close(area.error(), 2.0 * std::f64::consts::PI * 3.0 * 0.2, 1e-6));
    }
}
