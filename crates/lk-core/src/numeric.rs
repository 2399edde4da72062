/// Floating point type used throughout labkit
pub type Real = f64;

/// Central-difference step for a derivative taken at `x`.
///
/// Scales with `x` as `sqrt(eps) * x`, so the step is exactly zero at the origin.
#[inline]
pub fn difference_step(x: Real) -> Real {
    Real::EPSILON.sqrt() * x
}

/// Central difference estimate of `f'(x)` with step `h`.
///
/// Returns `None` when `h` is zero.
pub fn central_difference<F>(f: F, x: Real, h: Real) -> Option<Real>
where
    F: Fn(Real) -> Real,
{
    if h == 0.0 {
        return None;
    }
    Some((f(x + h) - f(x - h)) / (2.0 * h))
}

/// Power-of-ten exponent of `|x|` (`floor(log10|x|)`), `None` for zero or non-finite input.
#[inline]
pub fn decade(x: Real) -> Option<i32> {
    if x == 0.0 || !x.is_finite() {
        return None;
    }
    Some(x.abs().log10().floor() as i32)
}

/// Round `x` to `decimals` places after the decimal point.
///
/// Negative `decimals` rounds to tens, hundreds, ...
pub fn round_to_decimals(x: Real, decimals: i32) -> Real {
    if decimals >= 0 {
        let scale = 10f64.powi(decimals);
        (x * scale).round() / scale
    } else {
        let scale = 10f64.powi(-decimals);
        (x / scale).round() * scale
    }
}
