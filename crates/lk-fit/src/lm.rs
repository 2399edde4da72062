//! Levenberg-Marquardt least squares.

use crate::error::{FitError, FitResult};
use nalgebra::{DMatrix, DVector};

/// Levenberg-Marquardt configuration.
#[derive(Debug, Clone)]
pub struct LmConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Initial damping
    pub initial_lambda: f64,
    /// Damping multiplier after a rejected step (divisor after an accepted one)
    pub lambda_factor: f64,
    /// Damping at which the search gives up moving
    pub max_lambda: f64,
    /// Relative reduction of the cost treated as converged
    pub ftol: f64,
    /// Relative step size treated as converged
    pub xtol: f64,
    /// Finite difference step for the Jacobian
    pub jacobian_epsilon: f64,
}

impl Default for LmConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_factor: 10.0,
            max_lambda: 1e16,
            ftol: 1e-12,
            xtol: 1e-12,
            jacobian_epsilon: 1e-6,
        }
    }
}

/// Levenberg-Marquardt result.
#[derive(Debug, Clone)]
pub struct LmResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Sum of squared residuals at the solution
    pub cost: f64,
    /// Residual Jacobian at the solution
    pub jacobian: DMatrix<f64>,
    /// Number of iterations
    pub iterations: usize,
}

/// Minimize `|r(x)|²` with Marquardt's diagonal scaling.
///
/// Each iteration solves `(JᵀJ + λ diag(JᵀJ)) dx = -Jᵀr`. Accepted steps shrink
/// `λ`, rejected steps grow it.
pub fn lm_solve<F, J>(
    x0: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &LmConfig,
) -> FitResult<LmResult>
where
    F: Fn(&DVector<f64>) -> FitResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> FitResult<DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut cost = r.norm_squared();
    if !cost.is_finite() {
        return Err(FitError::Numeric {
            what: "non-finite residual at the initial guess".to_string(),
        });
    }
    let mut jac = jacobian_fn(&x)?;
    let mut lambda = config.initial_lambda;

    for iter in 0..config.max_iterations {
        if cost == 0.0 {
            return Ok(LmResult {
                x,
                cost,
                jacobian: jac,
                iterations: iter,
            });
        }

        let jtj = jac.transpose() * &jac;
        let gradient = jac.transpose() * &r;

        let mut damped = jtj.clone();
        for i in 0..damped.nrows() {
            damped[(i, i)] += lambda * jtj[(i, i)].max(f64::MIN_POSITIVE);
        }

        let dx = damped
            .lu()
            .solve(&(-gradient))
            .ok_or(FitError::Singular)?;

        let small_step = dx.norm() <= config.xtol * (x.norm() + config.xtol);

        let x_new = &x + &dx;
        let r_new = residual_fn(&x_new)?;
        let cost_new = r_new.norm_squared();

        tracing::debug!(iter, cost, cost_new, lambda, "lm iteration");

        if cost_new.is_finite() && cost_new < cost {
            let reduction = cost - cost_new;
            x = x_new;
            r = r_new;
            cost = cost_new;
            jac = jacobian_fn(&x)?;
            lambda = (lambda / config.lambda_factor).max(f64::MIN_POSITIVE);

            if reduction <= config.ftol * cost || small_step {
                return Ok(LmResult {
                    x,
                    cost,
                    jacobian: jac,
                    iterations: iter + 1,
                });
            }
        } else {
            if small_step {
                return Ok(LmResult {
                    x,
                    cost,
                    jacobian: jac,
                    iterations: iter + 1,
                });
            }
            lambda *= config.lambda_factor;
            if lambda > config.max_lambda {
                return Err(FitError::ConvergenceFailed {
                    what: format!("damping grew past {} at iteration {}", config.max_lambda, iter),
                });
            }
        }
    }

    Err(FitError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, cost = {}",
            config.max_iterations, cost
        ),
    })
}
