//! Integration tests for SABR surface calibration on a swaption grid.

use approx::assert_relative_eq;
use pricer_core::market_data::surfaces::GridPoint;
use pricer_core::sensitivities::SabrParameter;
use pricer_core::types::ErrorCategory;
use pricer_models::calibration::SabrSmile;
use pricer_models::models::SabrParameters;
use pricer_optimiser::calibration::{SabrSurfaceCalibrator, SurfaceCalibrationError};

/// ATM and +/- 25, 50, 100bp.
const OFFSETS: [f64; 7] = [-0.01, -0.005, -0.0025, 0.0, 0.0025, 0.005, 0.01];
const EXPIRIES: [f64; 3] = [0.5, 2.0, 5.0];
const TENORS: [f64; 3] = [1.0, 5.0, 10.0];

fn truth() -> SabrParameters {
    SabrParameters::new(0.05, 0.5, -0.25, 0.5).unwrap()
}

fn forward(point: GridPoint) -> f64 {
    0.03 + 0.001 * point.expiry + 0.0005 * point.tenor
}

fn market_smile(params: &SabrParameters, point: GridPoint) -> SabrSmile {
    let f = forward(point);
    let vols = OFFSETS
        .iter()
        .map(|o| params.volatility(f, f + o, point.expiry).unwrap())
        .collect();
    SabrSmile::from_offsets(f, point.expiry, &OFFSETS, vols)
}

fn market() -> Vec<(GridPoint, SabrSmile)> {
    EXPIRIES
        .iter()
        .flat_map(|&e| TENORS.iter().map(move |&t| GridPoint::new(e, t)))
        .map(|point| (point, market_smile(&truth(), point)))
        .collect()
}

// ============================================================================
// Recovery
// ============================================================================

#[test]
fn test_recovers_known_parameters_on_every_node() {
    let surfaces = SabrSurfaceCalibrator::default().calibrate(&market()).unwrap();
    let expected = truth();

    for point in surfaces.grid_points() {
        let fitted = surfaces.parameters_at(point.expiry, point.tenor).unwrap();
        for param in SabrParameter::ALL {
            assert_relative_eq!(fitted.get(param), expected.get(param), epsilon = 1e-6);
        }
    }
    assert_eq!(surfaces.grid_points().len(), EXPIRIES.len() * TENORS.len());
}

#[test]
fn test_reprices_smiles_between_and_beyond_nodes() {
    let surfaces = SabrSurfaceCalibrator::default().calibrate(&market()).unwrap();

    for &(expiry, tenor) in &[(1.0, 3.0), (3.5, 7.5), (10.0, 30.0), (0.1, 0.5)] {
        let f = 0.035;
        for offset in OFFSETS {
            let fitted = surfaces.volatility(expiry, tenor, f, f + offset).unwrap();
            let expected = truth().volatility(f, f + offset, expiry).unwrap();
            assert_relative_eq!(fitted, expected, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_inverse_jacobian_kept_for_every_node() {
    let surfaces = SabrSurfaceCalibrator::default().calibrate(&market()).unwrap();

    assert_eq!(surfaces.inverse_jacobians().len(), EXPIRIES.len() * TENORS.len());
    for (point, inverse) in surfaces.inverse_jacobians() {
        assert_eq!(inverse.shape(), (4, OFFSETS.len()), "at {}", point);
        // Beta is held at its initial value
        assert!(inverse.row(SabrParameter::Beta.index()).iter().all(|v| *v == 0.0));
        // ATM vol moves alpha
        assert!(inverse[(SabrParameter::Alpha.index(), 3)].abs() > 0.0);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_bad_smile_is_reported_with_its_point() {
    let mut smiles = market();
    let bad = GridPoint::new(2.0, 5.0);
    for (point, smile) in smiles.iter_mut() {
        if *point == bad {
            smile.volatilities[3] = f64::NAN;
        }
    }

    let err = SabrSurfaceCalibrator::default().calibrate(&smiles).unwrap_err();
    assert_eq!(err.failed_point(), Some(bad));
    assert!(matches!(err, SurfaceCalibrationError::PointFailure { .. }));
    assert_ne!(err.category(), ErrorCategory::InvalidConfiguration);
}
