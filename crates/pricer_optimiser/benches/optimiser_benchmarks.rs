//! Benchmarks for pricer_optimiser.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::DVector;
use pricer_core::market_data::curves::{CurveInterpolation, CurveSet};
use pricer_core::market_data::surfaces::GridPoint;
use pricer_models::calculators::ParRateCalculator;
use pricer_models::calibration::SabrSmile;
use pricer_models::instruments::{Cash, FixedLeg, FloatingLeg, RateInstrument, Swap, SwapDirection};
use pricer_models::models::SabrParameters;
use pricer_optimiser::bootstrapping::{CalibrationNodeSet, MultiCurveFinder, MultiCurveProblem};
use pricer_optimiser::calibration::SabrSurfaceCalibrator;

/// Two curves of `size` nodes each: deposits then annual swaps.
fn two_curve_finder(size: usize) -> MultiCurveFinder<ParRateCalculator> {
    let times: Vec<f64> = (1..=size).map(|i| i as f64).collect();
    let mut instruments: Vec<RateInstrument> = Vec::with_capacity(2 * size);
    for &t in &times {
        instruments.push(Cash::new("DSC", 0.0, t, 0.02 + 0.0005 * t).unwrap().into());
    }
    for &t in &times {
        let rate = 0.025 + 0.0005 * t;
        let swap = Swap::new(
            "DSC",
            "FWD",
            FixedLeg::regular(0.0, t, 1, rate).unwrap(),
            FloatingLeg::regular(0.0, t, 4).unwrap(),
            SwapDirection::PayFixed,
        );
        instruments.push(swap.into());
    }
    let nodes = CalibrationNodeSet::new()
        .with_curve("DSC", times.clone(), CurveInterpolation::Linear)
        .unwrap()
        .with_curve("FWD", times, CurveInterpolation::Linear)
        .unwrap();
    let problem = MultiCurveProblem::at_quotes(instruments, nodes, CurveSet::new()).unwrap();
    MultiCurveFinder::new(problem, ParRateCalculator)
}

fn benchmark_multi_curve_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_curve_solve");

    for size in [5, 10, 20] {
        let finder = two_curve_finder(size);
        group.bench_with_input(BenchmarkId::from_parameter(2 * size), &finder, |b, finder| {
            b.iter(|| finder.solve())
        });
    }

    group.finish();
}

fn benchmark_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration_jacobian");
    let finder = two_curve_finder(10);
    let x = DVector::from_element(20, 0.03);

    group.bench_function("analytic", |b| b.iter(|| finder.analytic_jacobian(black_box(&x))));
    group.bench_function("finite_difference", |b| {
        b.iter(|| finder.finite_difference_jacobian(black_box(&x), 1e-6))
    });

    group.finish();
}

fn benchmark_sabr_surface(c: &mut Criterion) {
    let truth = SabrParameters::new(0.05, 0.5, -0.25, 0.5).unwrap();
    let offsets = [-0.01, -0.005, -0.0025, 0.0, 0.0025, 0.005, 0.01];
    let smiles: Vec<(GridPoint, SabrSmile)> = [0.5, 1.0, 2.0, 5.0, 10.0]
        .iter()
        .flat_map(|&e| [1.0, 2.0, 5.0, 10.0].map(move |t| GridPoint::new(e, t)))
        .map(|point| {
            let vols = offsets
                .iter()
                .map(|o| truth.volatility(0.04, 0.04 + o, point.expiry).unwrap())
                .collect();
            (point, SabrSmile::from_offsets(0.04, point.expiry, &offsets, vols))
        })
        .collect();
    let calibrator = SabrSurfaceCalibrator::default();

    c.bench_function("sabr_surface_5x4", |b| b.iter(|| calibrator.calibrate(black_box(&smiles))));
}

criterion_group!(
    benches,
    benchmark_multi_curve_solve,
    benchmark_jacobian,
    benchmark_sabr_surface
);
criterion_main!(benches);
