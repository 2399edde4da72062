use clap::{Parser, Subcommand};
use lk_cli::gauss_fit::{self, GaussParams};
use lk_cli::gravity::{self, GravityParams};
use lk_cli::{CliResult, Style, logging, pi};
use lk_fit::FitOutcome;
use lk_measure::{AverageInput, average};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "labkit")]
#[command(about = "labkit - measurement error propagation and fitting helpers", long_about = None)]
struct Cli {
    /// Print configuration YAML (error_digits and modes)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print mode used for measurements
    #[arg(long, global = true, default_value = "default")]
    mode: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a simulated free-fall experiment
    Gravity {
        /// Number of timed drops
        #[arg(long, default_value_t = 10)]
        trials: usize,
        /// Drop height in meters
        #[arg(long, default_value_t = 3.0)]
        height: f64,
        /// Height uncertainty in meters
        #[arg(long, default_value_t = 0.01)]
        dy: f64,
        /// Timing uncertainty in seconds
        #[arg(long, default_value_t = 0.05)]
        dt: f64,
        /// True gravitational acceleration used to simulate the drops
        #[arg(long, default_value_t = 9.81)]
        g: f64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Estimate pi by Monte Carlo sampling
    Pi {
        #[arg(long, default_value_t = 1_000_000)]
        samples: u64,
        /// Independent batches, run in parallel
        #[arg(long, default_value_t = 8)]
        batches: usize,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Fit a Gaussian to generated data
    GaussFit {
        #[arg(long, default_value_t = 1000)]
        points: usize,
        /// Standard deviation of the noise added to x and y
        #[arg(long, default_value_t = 0.2)]
        noise: f64,
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
    /// Average values, weighted by errors when given
    Average {
        #[arg(long, num_args = 1.., required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
        #[arg(long, num_args = 1..)]
        errors: Option<Vec<f64>>,
        #[arg(long, default_value = "avg")]
        name: String,
        #[arg(long, default_value = "arb")]
        units: String,
    },
    /// List configured print modes
    Modes,
}

fn main() -> CliResult<()> {
    // warn level unless RUST_LOG says otherwise
    logging::init();

    let cli = Cli::parse();
    let style = Style::load(cli.config.as_deref(), &cli.mode)?;

    match cli.command {
        Commands::Gravity {
            trials,
            height,
            dy,
            dt,
            g,
            seed,
        } => cmd_gravity(
            &GravityParams {
                trials,
                dt,
                g,
                y0: height,
                dy,
                seed,
            },
            &style,
        ),
        Commands::Pi {
            samples,
            batches,
            seed,
        } => cmd_pi(samples, batches, seed, &style),
        Commands::GaussFit {
            points,
            noise,
            seed,
        } => cmd_gauss_fit(
            &GaussParams {
                points,
                noise_sd: noise,
                seed,
                ..GaussParams::default()
            },
            &style,
        ),
        Commands::Average {
            values,
            errors,
            name,
            units,
        } => cmd_average(&values, errors.as_deref(), &name, &units, &style),
        Commands::Modes => cmd_modes(&style),
    }
}

fn banner(title: &str) {
    let rule = "*".repeat(30);
    println!("{rule}\n  {title}\n{rule}");
}

fn cmd_gravity(params: &GravityParams, style: &Style) -> CliResult<()> {
    let report = gravity::run(params, style)?;

    println!("Measured {}", report.height);
    println!();
    for trial in &report.trials {
        println!("{}", trial.time);
        println!("  g = {}", trial.g);
        println!(
            "  explicitly: {:.4} +/- {:.4}",
            trial.g.value(),
            trial.explicit_error
        );
    }
    println!();
    banner("Final Result");
    println!(
        "{}\texplicitly: {:.4} +/- {:.4}",
        report.average, report.explicit_average, report.explicit_average_error
    );
    println!("true g = {}", params.g);
    Ok(())
}

fn cmd_pi(samples: u64, batches: usize, seed: u64, style: &Style) -> CliResult<()> {
    let estimate = style.apply(pi::estimate_pi(samples, batches, seed)?);
    println!("{estimate}");
    println!(
        "deviation from pi: {:.2} sigma",
        (estimate.value() - std::f64::consts::PI) / estimate.error()
    );
    Ok(())
}

fn print_fit(title: &str, fit: &FitOutcome, style: &Style) {
    println!("{title}:");
    for m in fit.measurements() {
        println!("  {}", style.apply(m));
    }
    println!(
        "  chi2/dof = {:.3} / {} = {:.3} ({} iterations)",
        fit.chi2, fit.dof, fit.reduced_chi2, fit.iterations
    );
}

fn cmd_gauss_fit(params: &GaussParams, style: &Style) -> CliResult<()> {
    let report = gauss_fit::run(params)?;

    println!("Generated {} test points for a Gaussian", params.points);
    println!("True parameters:");
    println!(
        "  A = {}\n  x0 = {}\n  s = {}\n  C = {}",
        params.amplitude, params.mean, params.sigma, params.constant
    );
    print_fit("Fit to truth data", &report.truth_fit, style);
    print_fit("Fit to noisy data", &report.noisy_fit, style);
    Ok(())
}

fn cmd_average(
    values: &[f64],
    errors: Option<&[f64]>,
    name: &str,
    units: &str,
    style: &Style,
) -> CliResult<()> {
    let input = match errors {
        Some(errors) => AverageInput::Weighted { values, errors },
        None => AverageInput::Values(values),
    };
    let avg = style.apply(average(input, name)?.with_units(units));
    println!("{avg}");
    Ok(())
}

fn cmd_modes(style: &Style) -> CliResult<()> {
    let config = style.config();
    println!("error digits: {}", config.error_digits);
    for (name, template) in &config.modes {
        println!("  {name:<10} {template}");
    }
    Ok(())
}
