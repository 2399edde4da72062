//! Free-fall experiment.
//!
//! A particle dropped from height `y0` lands after `t = sqrt(2 y0 / g)`; each
//! timed trial gives `g = 2 y0 / t²`. The propagated error is checked against
//! the closed form `dg = g sqrt((dy/y0)² + (2 dt/t)²)` and the trials are
//! combined with a weighted average.

use crate::error::{CliError, CliResult};
use crate::noise;
use crate::style::Style;
use lk_measure::{Measurement, weighted_average};

#[derive(Debug, Clone)]
pub struct GravityParams {
    pub trials: usize,
    /// Timing uncertainty (s)
    pub dt: f64,
    /// True acceleration (m/s²)
    pub g: f64,
    /// Drop height (m)
    pub y0: f64,
    /// Height uncertainty (m)
    pub dy: f64,
    pub seed: u64,
}

impl Default for GravityParams {
    fn default() -> Self {
        Self {
            trials: 10,
            dt: 0.05,
            g: 9.81,
            y0: 3.0,
            dy: 0.01,
            seed: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Trial {
    pub time: Measurement,
    pub g: Measurement,
    /// Closed-form error for this trial
    pub explicit_error: f64,
}

#[derive(Debug, Clone)]
pub struct GravityReport {
    pub height: Measurement,
    pub trials: Vec<Trial>,
    pub average: Measurement,
    pub explicit_average: f64,
    pub explicit_average_error: f64,
}

pub fn run(params: &GravityParams, style: &Style) -> CliResult<GravityReport> {
    if params.trials == 0 {
        return Err(CliError::InvalidArg {
            what: "at least one trial is needed".to_string(),
        });
    }

    let mut rng = noise::rng(params.seed);
    let t_true = (2.0 * params.y0 / params.g).sqrt();

    let height = style.apply(
        Measurement::new(noise::gaussian(&mut rng, params.y0, params.dy), params.dy)
            .named("height")
            .with_units("m"),
    );

    let mut trials = Vec::with_capacity(params.trials);
    for i in 0..params.trials {
        let time = style.apply(
            Measurement::new(noise::gaussian(&mut rng, t_true, params.dt), params.dt)
                .named(format!("trial {i}"))
                .with_units("s"),
        );
        let g = (2.0 * &height / time.powf(2.0))?;
        let explicit_error = g.value()
            * ((params.dy / height.value()).powi(2) + (2.0 * params.dt / time.value()).powi(2))
                .sqrt();
        trials.push(Trial {
            time,
            g,
            explicit_error,
        });
    }

    let gs: Vec<Measurement> = trials.iter().map(|t| t.g.clone()).collect();
    let average = weighted_average(&gs)?.named("g");

    let (weighted_sum, norm) = trials.iter().fold((0.0, 0.0), |(s, n), t| {
        let w = 1.0 / t.explicit_error.powi(2);
        (s + t.g.value() * w, n + w)
    });

    tracing::debug!(trials = params.trials, g = average.value(), "gravity analysis done");

    Ok(GravityReport {
        height,
        trials,
        average,
        explicit_average: weighted_sum / norm,
        explicit_average_error: (1.0 / norm).sqrt(),
    })
}
