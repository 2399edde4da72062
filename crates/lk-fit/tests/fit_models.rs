//! End-to-end fits of the built-in and custom models.

use lk_fit::{CustomModel, FitConfig, FitData, FitError, Model, fit_data};

fn gaussian(x: f64, a: f64, x0: f64, s: f64, c: f64) -> f64 {
    a * (-(x - x0).powi(2) / (2.0 * s * s)).exp() + c
}

fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
        .collect()
}

/// Deterministic zero-mean wiggle standing in for noise.
fn wiggle(i: usize, amplitude: f64) -> f64 {
    amplitude * ((i as f64) * 12.9898).sin()
}

#[test]
fn linear_fit_of_exact_data() {
    let x = linspace(0.0, 10.0, 11);
    let y: Vec<f64> = x.iter().map(|x| 1.5 + 0.5 * x).collect();

    let out = fit_data(&Model::Linear, &FitData::new(&x, &y), None, &FitConfig::default()).unwrap();

    assert!((out.params[0] - 1.5).abs() < 1e-8);
    assert!((out.params[1] - 0.5).abs() < 1e-8);
    assert!(out.chi2 < 1e-12);
    assert_eq!(out.dof, 9);
    assert_eq!(out.param_names, vec!["b", "a"]);
}

#[test]
fn polynomial_from_string() {
    let model: Model = "p2".parse().unwrap();
    let x = linspace(-3.0, 3.0, 25);
    let y: Vec<f64> = x.iter().map(|x| 2.0 - x + 0.25 * x * x).collect();

    let out = fit_data(&model, &FitData::new(&x, &y), None, &FitConfig::default()).unwrap();

    for (got, want) in out.params.iter().zip([2.0, -1.0, 0.25]) {
        assert!((got - want).abs() < 1e-7, "{got} vs {want}");
    }
}

#[test]
fn gaussian_truth_data_from_crude_guess() {
    let x = linspace(-2.0, 12.0, 200);
    let y: Vec<f64> = x.iter().map(|x| gaussian(*x, 6.7, 4.5, 1.2, 0.2)).collect();

    let mean = x.iter().sum::<f64>() / x.len() as f64;
    let std = (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / x.len() as f64).sqrt();
    let max = y.iter().cloned().fold(f64::MIN, f64::max);
    let min = y.iter().cloned().fold(f64::MAX, f64::min);
    let guess = [max - min, mean, std, min];

    let out = fit_data(
        &Model::Gaussian,
        &FitData::new(&x, &y),
        Some(&guess),
        &FitConfig::default(),
    )
    .unwrap();

    assert!((out.params[0] - 6.7).abs() < 1e-6);
    assert!((out.params[1] - 4.5).abs() < 1e-6);
    assert!((out.params[2].abs() - 1.2).abs() < 1e-6);
    assert!((out.params[3] - 0.2).abs() < 1e-6);
}

#[test]
fn weighted_fit_errors_cover_truth() {
    let x = linspace(0.0, 10.0, 50);
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, x)| 3.0 + 2.0 * x + wiggle(i, 0.1))
        .collect();
    let dy = vec![0.1; x.len()];

    let out = fit_data(
        &Model::Linear,
        &FitData::new(&x, &y).with_dy(&dy),
        None,
        &FitConfig::default(),
    )
    .unwrap();

    let params = out.measurements();
    assert_eq!(params[0].name(), "b");
    assert!((params[0].value() - 3.0).abs() < 5.0 * params[0].error());
    assert!((params[1].value() - 2.0).abs() < 5.0 * params[1].error());
    assert!(out.reduced_chi2 > 0.0 && out.reduced_chi2 < 2.0);
}

#[test]
fn x_errors_need_a_guess() {
    let x = linspace(0.0, 1.0, 5);
    let y = x.clone();
    let dx = vec![0.01; 5];

    let err = fit_data(
        &Model::Linear,
        &FitData::new(&x, &y).with_dx(&dx),
        None,
        &FitConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FitError::GuessRequired));
}

#[test]
fn x_errors_on_a_line() {
    let x = linspace(0.0, 10.0, 40);
    let y: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, x)| 1.0 + 0.8 * x + wiggle(i, 0.05))
        .collect();
    let dx = vec![0.05; x.len()];
    let dy = vec![0.05; x.len()];

    let out = fit_data(
        &Model::Linear,
        &FitData::new(&x, &y).with_dx(&dx).with_dy(&dy),
        Some(&[0.0, 1.0]),
        &FitConfig::default(),
    )
    .unwrap();

    let slope = out.parameter("a").unwrap();
    assert!((slope.value() - 0.8).abs() < 0.02);
    assert!(slope.error() > 0.0);
}

#[test]
fn custom_model() {
    let model = Model::Custom(
        CustomModel::new("decay", 2, |x, p| p[0] * (-p[1] * x).exp())
            .with_param_names(&["N0", "k"])
            .unwrap(),
    );
    let x = linspace(0.0, 5.0, 30);
    let y: Vec<f64> = x.iter().map(|x| 4.0 * (-0.7 * x).exp()).collect();

    let out = fit_data(&model, &FitData::new(&x, &y), None, &FitConfig::default()).unwrap();

    assert!((out.parameter("N0").unwrap().value() - 4.0).abs() < 1e-6);
    assert!((out.parameter("k").unwrap().value() - 0.7).abs() < 1e-6);
    assert!(out.parameter("missing").is_none());
}

#[test]
fn rejects_bad_input() {
    let x = [0.0, 1.0];
    let y = [0.0, 1.0];
    assert!(matches!(
        fit_data(&Model::Linear, &FitData::new(&x, &y), None, &FitConfig::default()),
        Err(FitError::InsufficientData { points: 2, params: 2 })
    ));

    let x = [0.0, 1.0, 2.0];
    let y = [0.0, 1.0];
    assert!(matches!(
        fit_data(&Model::Linear, &FitData::new(&x, &y), None, &FitConfig::default()),
        Err(FitError::LengthMismatch { what: "y", .. })
    ));

    let y = [0.0, 1.0, 2.0];
    let dy = [0.1, 0.0, 0.1];
    assert!(matches!(
        fit_data(
            &Model::Linear,
            &FitData::new(&x, &y).with_dy(&dy),
            None,
            &FitConfig::default()
        ),
        Err(FitError::InvalidArg { .. })
    ));

    assert!(matches!(
        fit_data(&Model::Linear, &FitData::new(&x, &y), Some(&[1.0]), &FitConfig::default()),
        Err(FitError::LengthMismatch { what: "guess", .. })
    ));
}
