//! Finite difference Jacobians with respect to model parameters.

use crate::error::FitResult;
use nalgebra::{DMatrix, DVector};

/// Compute Jacobian using central finite differences.
///
/// Column j perturbs p[j] by `epsilon * max(|p[j]|, 1)` in both directions.
pub fn central_difference_jacobian<F>(
    p: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> FitResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> FitResult<DVector<f64>>,
{
    let n = p.len();
    let m = f(p)?.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dp = epsilon * p[j].abs().max(1.0);

        let mut p_plus = p.clone();
        p_plus[j] += dp;
        let f_plus = f(&p_plus)?;

        let mut p_minus = p.clone();
        p_minus[j] -= dp;
        let f_minus = f(&p_minus)?;

        jac.set_column(j, &((f_plus - f_minus) / (2.0 * dp)));
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jacobian_linear() {
        // f(p) = [p0 + 2 p1, 3 p1]
        let f = |p: &DVector<f64>| -> FitResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![p[0] + 2.0 * p[1], 3.0 * p[1]]))
        };

        let p = DVector::from_vec(vec![1.0, -4.0]);
        let jac = central_difference_jacobian(&p, f, 1e-6).unwrap();

        assert!((jac[(0, 0)] - 1.0).abs() < 1e-8);
        assert!((jac[(0, 1)] - 2.0).abs() < 1e-8);
        assert!(jac[(1, 0)].abs() < 1e-8);
        assert!((jac[(1, 1)] - 3.0).abs() < 1e-8);
    }

    #[test]
    fn jacobian_exponential() {
        // f(p) = exp(p0), J = exp(p0)
        let f = |p: &DVector<f64>| -> FitResult<DVector<f64>> {
            Ok(DVector::from_element(1, p[0].exp()))
        };

        let p = DVector::from_element(1, 0.5);
        let jac = central_difference_jacobian(&p, f, 1e-6).unwrap();

        assert!((jac[(0, 0)] - 0.5f64.exp()).abs() < 1e-8);
    }
}
