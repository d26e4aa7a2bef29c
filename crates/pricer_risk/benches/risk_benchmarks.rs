//! Criterion benchmarks for node risk.
//!
//! Benchmarks cover:
//! - Curve node sensitivities per trade and per book, both modes
//! - SABR point-to-node redistribution and Black volatility risk

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricer_core::market_data::curves::{CurveInterpolation, CurveSet};
use pricer_core::market_data::surfaces::GridPoint;
use pricer_core::sensitivities::{SabrParameter, SabrSensitivity};
use pricer_models::calculators::{ParRateCalculator, PresentValueCalculator};
use pricer_models::calibration::SabrSmile;
use pricer_models::instruments::{Cash, FixedLeg, FloatingLeg, RateInstrument, Swap, SwapDirection};
use pricer_models::models::SabrParameters;
use pricer_optimiser::bootstrapping::{CalibrationNodeSet, MultiCurveFinder, MultiCurveProblem};
use pricer_optimiser::calibration::SabrSurfaceCalibrator;
use pricer_risk::curves::NodeSensitivityTransformer;
use pricer_risk::sabr::SabrSensitivityRedistributor;

fn swap(maturity: f64, rate: f64) -> RateInstrument {
    Swap::new(
        "DSC",
        "FWD",
        FixedLeg::regular(0.0, maturity, 1, rate).unwrap(),
        FloatingLeg::regular(0.0, maturity, 4).unwrap(),
        SwapDirection::PayFixed,
    )
    .into()
}

fn benchmark_curve_node_risk(c: &mut Criterion) {
    let times: Vec<f64> = (1..=10).map(|i| i as f64).collect();
    let mut instruments: Vec<RateInstrument> = times
        .iter()
        .map(|&t| Cash::new("DSC", 0.0, t, 0.02 + 0.001 * t).unwrap().into())
        .collect();
    instruments.extend(times.iter().map(|&t| swap(t, 0.025 + 0.001 * t)));
    let nodes = CalibrationNodeSet::new()
        .with_curve("DSC", times.clone(), CurveInterpolation::Linear)
        .unwrap()
        .with_curve("FWD", times, CurveInterpolation::Linear)
        .unwrap();
    let problem =
        MultiCurveProblem::at_quotes(instruments, nodes.clone(), CurveSet::new()).unwrap();
    let finder = MultiCurveFinder::new(problem, ParRateCalculator);
    let solution = finder.solve().unwrap();

    let unknown = NodeSensitivityTransformer::unknown_curves(nodes);
    let calibrated = NodeSensitivityTransformer::from_solution(&finder, &solution).unwrap();
    let trade = swap(7.5, 0.03);

    let mut group = c.benchmark_group("curve_node_risk");
    let curves = &solution.curves;
    group.bench_function("unknown_curves", |b| {
        b.iter(|| unknown.node_sensitivities(&PresentValueCalculator, black_box(&trade), curves))
    });
    group.bench_function("calibrated", |b| {
        b.iter(|| calibrated.node_sensitivities(&PresentValueCalculator, black_box(&trade), curves))
    });
    for size in [100, 1000] {
        let book: Vec<RateInstrument> = (0..size)
            .map(|i| swap(1.0 + (i % 9) as f64, 0.02 + 0.0001 * i as f64))
            .collect();
        group.bench_with_input(BenchmarkId::new("book", size), &book, |b, book| {
            b.iter(|| {
                calibrated.portfolio_node_sensitivities(&PresentValueCalculator, book, curves)
            })
        });
    }
    group.finish();
}

fn benchmark_sabr_risk(c: &mut Criterion) {
    let truth = SabrParameters::new(0.05, 0.5, -0.25, 0.5).unwrap();
    let offsets = [-0.01, -0.005, -0.0025, 0.0, 0.0025, 0.005, 0.01];
    let smiles: Vec<(GridPoint, SabrSmile)> = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .flat_map(|&e| [2.0, 5.0, 10.0].map(move |t| GridPoint::new(e, t)))
        .map(|point| {
            let vols = offsets
                .iter()
                .map(|o| truth.volatility(0.04, 0.04 + o, point.expiry).unwrap())
                .collect();
            (point, SabrSmile::from_offsets(0.04, point.expiry, &offsets, vols))
        })
        .collect();
    let surfaces = SabrSurfaceCalibrator::default().calibrate(&smiles).unwrap();

    let points = (0..200).fold(SabrSensitivity::new(), |acc, i| {
        let point = GridPoint::new(0.5 + 0.05 * i as f64, 1.0 + 0.04 * i as f64);
        SabrParameter::ALL
            .iter()
            .fold(acc, |acc, &p| acc.with(p, point, 1000.0 + i as f64))
    });
    let redistributor = SabrSensitivityRedistributor::new();

    let mut group = c.benchmark_group("sabr_risk");
    group.bench_function("node_sensitivities", |b| {
        b.iter(|| redistributor.calculate_node_sensitivities(black_box(&points), &surfaces))
    });
    group.bench_function("black_sensitivity", |b| {
        b.iter(|| redistributor.point_to_black_sensitivity(black_box(&points), &surfaces))
    });
    group.finish();
}

criterion_group!(benches, benchmark_curve_node_risk, benchmark_sabr_risk);
criterion_main!(benches);
