//! Arithmetic on measurements with first-order Gaussian error propagation.
//!
//! Operators are implemented for owned values and references, and for exact
//! constants (`f64`) on either side. Division returns
//! [`MeasureResult<Measurement>`] because a zero divisor is an error.

use crate::error::{MeasureError, MeasureResult};
use crate::measurement::Measurement;
use lk_core::Real;
use std::ops::{Add, Div, Mul, Neg, Sub};

impl Measurement {
    /// `self^p` for an exact exponent `p`.
    ///
    /// Error is `|p * v^(p-1) * σ|`.
    pub fn powf(&self, p: Real) -> Measurement {
        let value = self.value().powf(p);
        let error = (p * self.value().powf(p - 1.0) * self.error()).abs();
        self.derive(
            value,
            error,
            format!("({})^({p})", self.name()),
            format!("({})^({p})", self.units()),
        )
    }

    /// Divide by another measurement, failing if its value is zero.
    pub fn checked_div(&self, rhs: &Measurement) -> MeasureResult<Measurement> {
        quotient(self, rhs)
    }

    /// Divide by an exact constant, failing if it is zero.
    pub fn checked_div_const(&self, c: Real) -> MeasureResult<Measurement> {
        scale_div(self, c)
    }

    /// `c / self`, failing if `self` has value zero.
    pub fn checked_recip(&self, c: Real) -> MeasureResult<Measurement> {
        reciprocal(c, self)
    }
}

fn warn_units(a: &Measurement, b: &Measurement, what: &'static str) {
    if a.units() != b.units() {
        tracing::warn!(left = %a.units(), right = %b.units(), "Units do not match up for {what}");
    }
}

fn negate(a: &Measurement) -> Measurement {
    a.derive(
        -a.value(),
        a.error(),
        a.name().to_string(),
        a.units().to_string(),
    )
}

fn sum(a: &Measurement, b: &Measurement) -> Measurement {
    warn_units(a, b, "addition");
    a.derive(
        a.value() + b.value(),
        a.error().hypot(b.error()),
        format!("{}+{}", a.name(), b.name()),
        a.units().to_string(),
    )
}

fn difference(a: &Measurement, b: &Measurement) -> Measurement {
    warn_units(a, b, "subtraction");
    a.derive(
        a.value() - b.value(),
        a.error().hypot(b.error()),
        format!("{}-{}", a.name(), b.name()),
        a.units().to_string(),
    )
}

fn shift(a: &Measurement, c: Real) -> Measurement {
    tracing::warn!(name = %a.name(), constant = c, "Adding a measurement to a normal number");
    a.derive(
        a.value() + c,
        a.error(),
        format!("{}+constant", a.name()),
        a.units().to_string(),
    )
}

fn shift_down(a: &Measurement, c: Real) -> Measurement {
    tracing::warn!(name = %a.name(), constant = c, "Subtracting a normal number from a measurement");
    a.derive(
        a.value() - c,
        a.error(),
        format!("{}-constant", a.name()),
        a.units().to_string(),
    )
}

fn shift_negated(c: Real, a: &Measurement) -> Measurement {
    tracing::warn!(name = %a.name(), constant = c, "Subtracting a measurement from a normal number");
    a.derive(
        c - a.value(),
        a.error(),
        format!("constant-{}", a.name()),
        a.units().to_string(),
    )
}

// |v1 v2| sqrt((σ1/v1)² + (σ2/v2)²) rewritten so a zero operand stays finite.
fn product(a: &Measurement, b: &Measurement) -> Measurement {
    a.derive(
        a.value() * b.value(),
        (a.error() * b.value()).hypot(b.error() * a.value()),
        format!("{}*{}", a.name(), b.name()),
        format!("{}*{}", a.units(), b.units()),
    )
}

fn scale(a: &Measurement, c: Real) -> Measurement {
    a.derive(
        a.value() * c,
        a.error() * c.abs(),
        a.name().to_string(),
        a.units().to_string(),
    )
}

fn quotient(a: &Measurement, b: &Measurement) -> MeasureResult<Measurement> {
    if b.value() == 0.0 {
        return Err(MeasureError::Division {
            what: format!("{}/{}", a.name(), b.name()),
        });
    }
    let q = a.value() / b.value();
    let error = a.error().hypot(q * b.error()) / b.value().abs();
    Ok(a.derive(
        q,
        error,
        format!("{}/{}", a.name(), b.name()),
        format!("{}/{}", a.units(), b.units()),
    ))
}

fn scale_div(a: &Measurement, c: Real) -> MeasureResult<Measurement> {
    if c == 0.0 {
        return Err(MeasureError::Division {
            what: format!("{}/constant", a.name()),
        });
    }
    Ok(a.derive(
        a.value() / c,
        a.error() / c.abs(),
        a.name().to_string(),
        a.units().to_string(),
    ))
}

fn reciprocal(c: Real, a: &Measurement) -> MeasureResult<Measurement> {
    if a.value() == 0.0 {
        return Err(MeasureError::Division {
            what: format!("{c}/{}", a.name()),
        });
    }
    Ok(a.derive(
        c / a.value(),
        (c * a.error() / (a.value() * a.value())).abs(),
        format!("{c}/{}", a.name()),
        format!("1/({})", a.units()),
    ))
}

impl Neg for Measurement {
    type Output = Measurement;

    fn neg(self) -> Measurement {
        negate(&self)
    }
}

impl Neg for &Measurement {
    type Output = Measurement;

    fn neg(self) -> Measurement {
        negate(self)
    }
}

macro_rules! measurement_binop {
    ($imp:ident, $method:ident, $out:ty, $f:ident) => {
        impl $imp<Measurement> for Measurement {
            type Output = $out;
            fn $method(self, rhs: Measurement) -> $out {
                $f(&self, &rhs)
            }
        }

        impl $imp<&Measurement> for Measurement {
            type Output = $out;
            fn $method(self, rhs: &Measurement) -> $out {
                $f(&self, rhs)
            }
        }

        impl $imp<Measurement> for &Measurement {
            type Output = $out;
            fn $method(self, rhs: Measurement) -> $out {
                $f(self, &rhs)
            }
        }

        impl $imp<&Measurement> for &Measurement {
            type Output = $out;
            fn $method(self, rhs: &Measurement) -> $out {
                $f(self, rhs)
            }
        }
    };
}

macro_rules! constant_binop {
    ($imp:ident, $method:ident, $out:ty, $right:ident, $left:ident) => {
        impl $imp<Real> for Measurement {
            type Output = $out;
            fn $method(self, rhs: Real) -> $out {
                $right(&self, rhs)
            }
        }

        impl $imp<Real> for &Measurement {
            type Output = $out;
            fn $method(self, rhs: Real) -> $out {
                $right(self, rhs)
            }
        }

        impl $imp<Measurement> for Real {
            type Output = $out;
            fn $method(self, rhs: Measurement) -> $out {
                $left(self, &rhs)
            }
        }

        impl $imp<&Measurement> for Real {
            type Output = $out;
            fn $method(self, rhs: &Measurement) -> $out {
                $left(self, rhs)
            }
        }
    };
}

fn shift_commuted(c: Real, a: &Measurement) -> Measurement {
    shift(a, c)
}

fn scale_commuted(c: Real, a: &Measurement) -> Measurement {
    scale(a, c)
}

measurement_binop!(Add, add, Measurement, sum);
measurement_binop!(Sub, sub, Measurement, difference);
measurement_binop!(Mul, mul, Measurement, product);
measurement_binop!(Div, div, MeasureResult<Measurement>, quotient);

constant_binop!(Add, add, Measurement, shift, shift_commuted);
constant_binop!(Sub, sub, Measurement, shift_down, shift_negated);
constant_binop!(Mul, mul, Measurement, scale, scale_commuted);
constant_binop!(Div, div, MeasureResult<Measurement>, scale_div, reciprocal);
