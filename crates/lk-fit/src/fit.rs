//! Fitting models to data with y (and optionally x) uncertainties.

use crate::error::{FitError, FitResult};
use crate::jacobian::central_difference_jacobian;
use crate::lm::{LmConfig, LmResult, lm_solve};
use crate::model::Model;
use lk_core::Real;
use lk_measure::Measurement;
use nalgebra::{DMatrix, DVector};

/// Data to fit: `y ≈ f(x)` with optional one-sigma errors on either axis.
#[derive(Debug, Clone, Copy)]
pub struct FitData<'a> {
    pub x: &'a [Real],
    pub y: &'a [Real],
    pub dx: Option<&'a [Real]>,
    pub dy: Option<&'a [Real]>,
}

impl<'a> FitData<'a> {
    pub fn new(x: &'a [Real], y: &'a [Real]) -> Self {
        Self {
            x,
            y,
            dx: None,
            dy: None,
        }
    }

    pub fn with_dx(mut self, dx: &'a [Real]) -> Self {
        self.dx = Some(dx);
        self
    }

    pub fn with_dy(mut self, dy: &'a [Real]) -> Self {
        self.dy = Some(dy);
        self
    }

    fn validate(&self) -> FitResult<()> {
        let n = self.x.len();
        let columns = [("y", Some(self.y)), ("dx", self.dx), ("dy", self.dy)];
        for (what, column) in columns {
            if let Some(column) = column {
                if column.len() != n {
                    return Err(FitError::LengthMismatch {
                        what,
                        expected: n,
                        actual: column.len(),
                    });
                }
            }
        }
        if let Some(dy) = self.dy {
            if dy.iter().any(|e| e.is_nan() || *e <= 0.0) {
                return Err(FitError::InvalidArg {
                    what: "dy must be positive".to_string(),
                });
            }
        }
        if let Some(dx) = self.dx {
            if dx.iter().any(|e| e.is_nan() || *e < 0.0) {
                return Err(FitError::InvalidArg {
                    what: "dx must be non-negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Fit configuration.
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub lm: LmConfig,
    /// Passes of re-weighting when x errors are present
    pub max_outer_iterations: usize,
    /// Relative parameter change that ends re-weighting
    pub outer_rel_tol: Real,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            lm: LmConfig::default(),
            max_outer_iterations: 20,
            outer_rel_tol: 1e-10,
        }
    }
}

/// Fitted parameters and goodness of fit.
#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub param_names: Vec<String>,
    pub params: Vec<Real>,
    /// One-sigma parameter errors, scaled by the reduced chi-squared.
    pub errors: Vec<Real>,
    pub covariance: DMatrix<Real>,
    pub chi2: Real,
    pub dof: usize,
    pub reduced_chi2: Real,
    pub iterations: usize,
}

impl FitOutcome {
    /// Parameters as measurements named after the model parameters.
    pub fn measurements(&self) -> Vec<Measurement> {
        self.param_names
            .iter()
            .zip(self.params.iter().zip(&self.errors))
            .map(|(name, (value, error))| Measurement::new(*value, *error).named(name.clone()))
            .collect()
    }

    pub fn parameter(&self, name: &str) -> Option<Measurement> {
        let i = self.param_names.iter().position(|n| n == name)?;
        Some(Measurement::new(self.params[i], self.errors[i]).named(name))
    }
}

/// Fit `model` to `data`.
///
/// Without x errors this is weighted least squares with weights `1/dy²` (unit
/// weights if `dy` is absent); `guess` defaults to all ones. With x errors a
/// guess is required, and each pass re-weights with the effective variance
/// `dy² + (f'(x) dx)²` evaluated at the current parameters, treating a missing
/// `dy` as 1.
pub fn fit_data(
    model: &Model,
    data: &FitData<'_>,
    guess: Option<&[Real]>,
    config: &FitConfig,
) -> FitResult<FitOutcome> {
    data.validate()?;

    let n_params = model.n_params();
    if data.x.len() <= n_params {
        return Err(FitError::InsufficientData {
            points: data.x.len(),
            params: n_params,
        });
    }

    let p0 = match (guess, data.dx) {
        (Some(g), _) => {
            if g.len() != n_params {
                return Err(FitError::LengthMismatch {
                    what: "guess",
                    expected: n_params,
                    actual: g.len(),
                });
            }
            DVector::from_column_slice(g)
        }
        (None, Some(_)) => return Err(FitError::GuessRequired),
        (None, None) => DVector::from_element(n_params, 1.0),
    };

    let Some(dx) = data.dx else {
        let sigma = match data.dy {
            Some(dy) => dy.to_vec(),
            None => vec![1.0; data.x.len()],
        };
        let result = weighted_fit(model, data, &sigma, p0, &config.lm)?;
        return summarize(
            model,
            data.x.len(),
            result.x,
            result.cost,
            &result.jacobian,
            result.iterations,
        );
    };

    let mut p = p0;
    let mut total_iterations = 0;
    for pass in 0..config.max_outer_iterations {
        let sigma = effective_sigma(model, data.x, dx, data.dy, p.as_slice());
        let result = weighted_fit(model, data, &sigma, p.clone(), &config.lm)?;
        total_iterations += result.iterations;

        let change = (&result.x - &p).norm();
        tracing::debug!(pass, cost = result.cost, change, "effective variance pass");
        p = result.x;
        if change <= config.outer_rel_tol * p.norm().max(1.0) {
            break;
        }
    }

    // Weights must match the parameters being reported.
    let sigma = effective_sigma(model, data.x, dx, data.dy, p.as_slice());
    let residual = whitened_residual(model, data, &sigma);
    let chi2 = residual(&p)?.norm_squared();
    if !chi2.is_finite() {
        return Err(FitError::Numeric {
            what: "non-finite chi-squared".to_string(),
        });
    }
    let jac = central_difference_jacobian(&p, &residual, config.lm.jacobian_epsilon)?;
    summarize(model, data.x.len(), p, chi2, &jac, total_iterations)
}

fn effective_sigma(
    model: &Model,
    x: &[Real],
    dx: &[Real],
    dy: Option<&[Real]>,
    p: &[Real],
) -> Vec<Real> {
    x.iter()
        .zip(dx)
        .enumerate()
        .map(|(i, (xi, dxi))| {
            let sy = dy.map_or(1.0, |dy| dy[i]);
            sy.hypot(model.slope(*xi, p) * dxi)
        })
        .collect()
}

fn whitened_residual<'m>(
    model: &'m Model,
    data: &'m FitData<'_>,
    sigma: &'m [Real],
) -> impl Fn(&DVector<Real>) -> FitResult<DVector<Real>> + 'm {
    move |p: &DVector<Real>| {
        let p = p.as_slice();
        Ok(DVector::from_iterator(
            data.x.len(),
            data.x
                .iter()
                .zip(data.y)
                .zip(sigma)
                .map(|((x, y), s)| (model.eval(*x, p) - y) / s),
        ))
    }
}

fn weighted_fit(
    model: &Model,
    data: &FitData<'_>,
    sigma: &[Real],
    p0: DVector<Real>,
    config: &LmConfig,
) -> FitResult<LmResult> {
    let residual = whitened_residual(model, data, sigma);
    let epsilon = config.jacobian_epsilon;
    let jacobian = |p: &DVector<Real>| central_difference_jacobian(p, &residual, epsilon);
    lm_solve(p0, &residual, jacobian, config)
}

fn summarize(
    model: &Model,
    n_points: usize,
    p: DVector<Real>,
    chi2: Real,
    jac: &DMatrix<Real>,
    iterations: usize,
) -> FitResult<FitOutcome> {
    let dof = n_points - model.n_params();
    let reduced_chi2 = chi2 / dof as Real;

    let jtj = jac.transpose() * jac;
    let covariance = jtj.try_inverse().ok_or(FitError::Singular)? * reduced_chi2;
    let errors = covariance.diagonal().iter().map(|v| v.abs().sqrt()).collect();

    Ok(FitOutcome {
        param_names: model.param_names(),
        params: p.iter().copied().collect(),
        errors,
        covariance,
        chi2,
        dof,
        reduced_chi2,
        iterations,
    })
}
