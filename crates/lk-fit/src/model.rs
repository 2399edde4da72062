//! Models that can be fitted.

use crate::error::FitError;
use lk_core::{Real, central_difference};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type ModelFn = Arc<dyn Fn(Real, &[Real]) -> Real + Send + Sync>;

/// A user supplied model `f(x, p)`.
#[derive(Clone)]
pub struct CustomModel {
    name: String,
    param_names: Vec<String>,
    f: ModelFn,
}

impl CustomModel {
    /// Model with `n_params` parameters named `p0`, `p1`, ...
    pub fn new(
        name: impl Into<String>,
        n_params: usize,
        f: impl Fn(Real, &[Real]) -> Real + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            param_names: (0..n_params).map(|i| format!("p{i}")).collect(),
            f: Arc::new(f),
        }
    }

    /// Replace the generated parameter names. The count must not change.
    pub fn with_param_names(mut self, names: &[&str]) -> Result<Self, FitError> {
        if names.len() != self.param_names.len() {
            return Err(FitError::LengthMismatch {
                what: "custom model parameter names",
                expected: self.param_names.len(),
                actual: names.len(),
            });
        }
        self.param_names = names.iter().map(|s| s.to_string()).collect();
        Ok(self)
    }
}

impl fmt::Debug for CustomModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomModel")
            .field("name", &self.name)
            .field("param_names", &self.param_names)
            .finish()
    }
}

/// Fit model.
#[derive(Debug, Clone)]
pub enum Model {
    /// `y = b + a x`, parameters `[b, a]`.
    Linear,
    /// `y = a0 + a1 x + ... + an xⁿ`.
    Polynomial(usize),
    /// `y = A exp(-(x - x0)² / (2 s²)) + C`, parameters `[A, x0, s, C]`.
    Gaussian,
    Custom(CustomModel),
}

impl Model {
    pub fn n_params(&self) -> usize {
        match self {
            Model::Linear => 2,
            Model::Polynomial(n) => n + 1,
            Model::Gaussian => 4,
            Model::Custom(c) => c.param_names.len(),
        }
    }

    pub fn param_names(&self) -> Vec<String> {
        match self {
            Model::Linear => vec!["b".to_string(), "a".to_string()],
            Model::Polynomial(n) => (0..=*n).map(|i| format!("a{i}")).collect(),
            Model::Gaussian => ["A", "x0", "s", "C"].iter().map(|s| s.to_string()).collect(),
            Model::Custom(c) => c.param_names.clone(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Model::Linear => "linear".to_string(),
            Model::Polynomial(n) => format!("p{n}"),
            Model::Gaussian => "gauss".to_string(),
            Model::Custom(c) => c.name.clone(),
        }
    }

    pub fn eval(&self, x: Real, p: &[Real]) -> Real {
        match self {
            Model::Linear => p[0] + p[1] * x,
            Model::Polynomial(_) => p.iter().rev().fold(0.0, |acc, a| acc * x + a),
            Model::Gaussian => {
                let d = x - p[1];
                p[0] * (-(d * d) / (2.0 * p[2] * p[2])).exp() + p[3]
            }
            Model::Custom(c) => (c.f)(x, p),
        }
    }

    /// `df/dx` at `x`, used to carry x errors into y.
    pub fn slope(&self, x: Real, p: &[Real]) -> Real {
        match self {
            Model::Linear => p[1],
            Model::Polynomial(_) => p
                .iter()
                .enumerate()
                .skip(1)
                .rev()
                .fold(0.0, |acc, (i, a)| acc * x + i as Real * a),
            Model::Gaussian => {
                let d = x - p[1];
                let s2 = p[2] * p[2];
                -p[0] * d / s2 * (-(d * d) / (2.0 * s2)).exp()
            }
            Model::Custom(c) => {
                let h = Real::EPSILON.sqrt() * x.abs().max(1.0);
                central_difference(|v| (c.f)(v, p), x, h).unwrap_or(0.0)
            }
        }
    }
}

impl FromStr for Model {
    type Err = FitError;

    /// `linear`, `gauss`, or `p{n}` for an nth order polynomial.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Model::Linear),
            "gauss" => Ok(Model::Gaussian),
            _ => s
                .strip_prefix('p')
                .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
                .and_then(|n| n.parse::<usize>().ok())
                .map(Model::Polynomial)
                .ok_or_else(|| FitError::InvalidModel {
                    name: s.to_string(),
                }),
        }
    }
}
