//! Monte Carlo estimate of pi.
//!
//! Points are drawn uniformly in `[-1, 1]²` and `4 * inside / total`
//! estimates pi. Samples are split into independently seeded batches run on
//! the rayon pool; each batch carries the binomial error
//! `4 sqrt(p (1 - p) / n)` and the batches are combined by weighted average.

use crate::error::{CliError, CliResult};
use crate::noise;
use lk_measure::{Measurement, weighted_average};
use rand::Rng;
use rayon::prelude::*;

pub fn estimate_pi(samples: u64, batches: usize, seed: u64) -> CliResult<Measurement> {
    if batches == 0 || samples < 2 * batches as u64 {
        return Err(CliError::InvalidArg {
            what: format!("need at least two samples per batch ({samples} samples, {batches} batches)"),
        });
    }

    let per_batch = samples / batches as u64;
    let remainder = samples % batches as u64;

    let estimates: Vec<Measurement> = (0..batches)
        .into_par_iter()
        .map(|b| {
            let n = per_batch + u64::from((b as u64) < remainder);
            batch_estimate(seed.wrapping_add(b as u64), n).named(format!("batch {b}"))
        })
        .collect();

    Ok(weighted_average(&estimates)?.named("pi"))
}

fn batch_estimate(seed: u64, n: u64) -> Measurement {
    let mut rng = noise::rng(seed);
    let mut inside = 0u64;
    for _ in 0..n {
        let x: f64 = 2.0 * rng.r#gen::<f64>() - 1.0;
        let y: f64 = 2.0 * rng.r#gen::<f64>() - 1.0;
        if x.hypot(y) < 1.0 {
            inside += 1;
        }
    }
    let p = inside as f64 / n as f64;
    Measurement::new(4.0 * p, 4.0 * (p * (1.0 - p) / n as f64).sqrt())
}
