//! Fit a Gaussian to generated data, once to the exact curve and once to
//! data jittered in both x and y.

use crate::error::{CliError, CliResult};
use crate::noise;
use lk_fit::{FitConfig, FitData, FitOutcome, Model, fit_data};

#[derive(Debug, Clone)]
pub struct GaussParams {
    pub amplitude: f64,
    pub mean: f64,
    pub sigma: f64,
    pub constant: f64,
    pub points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub noise_sd: f64,
    pub seed: u64,
}

impl Default for GaussParams {
    fn default() -> Self {
        Self {
            amplitude: 6.7,
            mean: 4.5,
            sigma: 1.2,
            constant: 0.2,
            points: 1000,
            x_min: -2.0,
            x_max: 12.0,
            noise_sd: 0.2,
            seed: 1,
        }
    }
}

impl GaussParams {
    pub fn truth(&self) -> [f64; 4] {
        [self.amplitude, self.mean, self.sigma, self.constant]
    }
}

#[derive(Debug, Clone)]
pub struct GaussReport {
    pub truth_fit: FitOutcome,
    pub noisy_fit: FitOutcome,
}

/// Guess from the data alone: peak-to-floor height, mean and spread of x, floor.
fn crude_guess(x: &[f64], y: &[f64]) -> [f64; 4] {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let std = (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = y.iter().copied().fold(f64::INFINITY, f64::min);
    [max - min, mean, std, min]
}

pub fn run(params: &GaussParams) -> CliResult<GaussReport> {
    if params.points < 2 {
        return Err(CliError::InvalidArg {
            what: "need at least two points".to_string(),
        });
    }
    let model = Model::Gaussian;
    let truth = params.truth();
    let step = (params.x_max - params.x_min) / (params.points - 1) as f64;

    let x_true: Vec<f64> = (0..params.points)
        .map(|i| params.x_min + step * i as f64)
        .collect();
    let y_true: Vec<f64> = x_true.iter().map(|x| model.eval(*x, &truth)).collect();

    let mut rng = noise::rng(params.seed);
    let x: Vec<f64> = x_true
        .iter()
        .map(|v| v + noise::gaussian(&mut rng, 0.0, params.noise_sd))
        .collect();
    let y: Vec<f64> = y_true
        .iter()
        .map(|v| v + noise::gaussian(&mut rng, 0.0, params.noise_sd))
        .collect();
    let errors = vec![params.noise_sd; params.points];

    let config = FitConfig::default();

    let guess = crude_guess(&x_true, &y_true);
    let truth_fit = fit_data(&model, &FitData::new(&x_true, &y_true), Some(&guess), &config)?;

    let guess = crude_guess(&x, &y);
    let noisy = FitData::new(&x, &y).with_dx(&errors).with_dy(&errors);
    let noisy_fit = fit_data(&model, &noisy, Some(&guess), &config)?;

    Ok(GaussReport {
        truth_fit,
        noisy_fit,
    })
}
