//! Point-to-node redistribution of SABR sensitivities and their
//! conversion to Black volatility risk.

use crate::error::RiskError;
use nalgebra::{DMatrix, DVector};
use pricer_core::market_data::surfaces::GridPoint;
use pricer_core::sensitivities::{SabrParameter, SabrSensitivity};
use pricer_optimiser::calibration::SabrSurfaceParameters;
use std::collections::BTreeMap;
use tracing::debug;

/// Black volatility sensitivities per grid node, one entry per
/// calibration strike.
pub type BlackSensitivity = BTreeMap<GridPoint, Vec<f64>>;

/// Moves SABR sensitivities from trade coordinates onto surface nodes.
///
/// Stateless; the surfaces and inverse Jacobians come in with each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SabrSensitivityRedistributor;

impl SabrSensitivityRedistributor {
    /// Create a redistributor.
    pub fn new() -> Self {
        Self
    }

    /// Spread point sensitivities onto the grid nodes of each parameter's
    /// surface.
    ///
    /// A point inside a cell reaches its four corners; on a border or in
    /// the flat extrapolation region it reaches fewer. Linear in
    /// `point_sensitivity`.
    ///
    /// # Errors
    ///
    /// `MarketData` if a surface cannot produce node weights.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use pricer_core::market_data::surfaces::{GridPoint, InterpolatedSurface};
    /// use pricer_core::sensitivities::{SabrParameter, SabrSensitivity};
    /// use pricer_optimiser::calibration::SabrSurfaceParameters;
    /// use pricer_risk::sabr::SabrSensitivityRedistributor;
    ///
    /// let flat = |v: f64| InterpolatedSurface::new(&[1.0, 2.0], &[5.0, 10.0], &[vec![v, v], vec![v, v]]).unwrap();
    /// let surfaces = SabrSurfaceParameters::new(flat(0.03), flat(0.5), flat(-0.2), flat(0.4), BTreeMap::new());
    ///
    /// let point = SabrSensitivity::new().with(SabrParameter::Alpha, GridPoint::new(1.5, 5.0), 4.0);
    /// let nodes = SabrSensitivityRedistributor::new()
    ///     .calculate_node_sensitivities(&point, &surfaces)
    ///     .unwrap();
    ///
    /// assert_eq!(nodes.get(SabrParameter::Alpha, GridPoint::new(1.0, 5.0)), 2.0);
    /// assert_eq!(nodes.get(SabrParameter::Alpha, GridPoint::new(2.0, 5.0)), 2.0);
    /// assert_eq!(nodes.sensitivities(SabrParameter::Alpha).len(), 2);
    /// ```
    pub fn calculate_node_sensitivities(
        &self,
        point_sensitivity: &SabrSensitivity,
        surfaces: &SabrSurfaceParameters,
    ) -> Result<SabrSensitivity, RiskError> {
        let mut nodes = SabrSensitivity::new();
        for parameter in SabrParameter::ALL {
            let surface = surfaces.surface(parameter);
            for (point, &amount) in point_sensitivity.sensitivities(parameter) {
                for (node, weight) in surface.node_weights(point.expiry, point.tenor)? {
                    nodes.add(parameter, node, amount * weight);
                }
            }
        }
        Ok(nodes)
    }

    /// Black volatility sensitivities from node sensitivities.
    ///
    /// For every node with a non-zero parameter sensitivity, the row
    /// `(dV/dalpha, dV/dbeta, dV/drho, dV/dnu)` is multiplied by the node's
    /// `4 x n` inverse Jacobian. Nodes without an inverse Jacobian are
    /// skipped.
    ///
    /// # Errors
    ///
    /// `SabrJacobianShape` if an inverse Jacobian does not have 4 rows.
    pub fn black_sensitivity(
        &self,
        node_sensitivity: &SabrSensitivity,
        inverse_jacobians: &BTreeMap<GridPoint, DMatrix<f64>>,
    ) -> Result<BlackSensitivity, RiskError> {
        let mut result = BlackSensitivity::new();
        for point in node_sensitivity.points() {
            let Some(inverse) = inverse_jacobians.get(&point) else {
                debug!(%point, "no inverse jacobian, skipping node");
                continue;
            };
            if inverse.nrows() != SabrParameter::ALL.len() {
                return Err(RiskError::SabrJacobianShape {
                    point,
                    rows: inverse.nrows(),
                });
            }
            let row = DVector::from_iterator(
                4,
                SabrParameter::ALL.iter().map(|&p| node_sensitivity.get(p, point)),
            );
            if row.iter().all(|v| *v == 0.0) {
                continue;
            }
            result.insert(point, inverse.tr_mul(&row).iter().copied().collect());
        }
        Ok(result)
    }

    /// Point sensitivities straight to Black volatility risk.
    pub fn point_to_black_sensitivity(
        &self,
        point_sensitivity: &SabrSensitivity,
        surfaces: &SabrSurfaceParameters,
    ) -> Result<BlackSensitivity, RiskError> {
        let nodes = self.calculate_node_sensitivities(point_sensitivity, surfaces)?;
        self.black_sensitivity(&nodes, surfaces.inverse_jacobians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::surfaces::InterpolatedSurface;
    use pricer_core::types::ErrorCategory;

    fn surface(values: [[f64; 3]; 2]) -> InterpolatedSurface {
        let rows = values.map(|r| r.to_vec());
        InterpolatedSurface::new(&[1.0, 5.0], &[2.0, 5.0, 10.0], &rows).unwrap()
    }

    fn surfaces(inverse_jacobians: BTreeMap<GridPoint, DMatrix<f64>>) -> SabrSurfaceParameters {
        SabrSurfaceParameters::new(
            surface([[0.03, 0.031, 0.032], [0.033, 0.034, 0.035]]),
            surface([[0.5; 3]; 2]),
            surface([[-0.2, -0.25, -0.3], [-0.2, -0.25, -0.3]]),
            surface([[0.4, 0.38, 0.36], [0.34, 0.32, 0.3]]),
            inverse_jacobians,
        )
    }

    // ========================================
    // Node redistribution
    // ========================================

    #[test]
    fn test_interior_point_reaches_four_nodes() {
        let point = SabrSensitivity::new().with(SabrParameter::Rho, GridPoint::new(2.0, 4.0), 1.0);
        let nodes = SabrSensitivityRedistributor::new()
            .calculate_node_sensitivities(&point, &surfaces(BTreeMap::new()))
            .unwrap();

        let rho = nodes.sensitivities(SabrParameter::Rho);
        assert_eq!(rho.len(), 4);
        assert_relative_eq!(rho.values().sum::<f64>(), 1.0, epsilon = 1e-15);
        // u = 0.25 along expiry, v = 2/3 along tenor
        assert_relative_eq!(
            nodes.get(SabrParameter::Rho, GridPoint::new(1.0, 5.0)),
            0.75 * 2.0 / 3.0,
            epsilon = 1e-15
        );
        assert!(nodes.sensitivities(SabrParameter::Alpha).is_empty());
    }

    #[test]
    fn test_extrapolated_point_reaches_border_nodes() {
        let point = SabrSensitivity::new().with(SabrParameter::Nu, GridPoint::new(10.0, 1.0), 3.0);
        let nodes = SabrSensitivityRedistributor::new()
            .calculate_node_sensitivities(&point, &surfaces(BTreeMap::new()))
            .unwrap();
        assert_eq!(nodes.sensitivities(SabrParameter::Nu).len(), 1);
        assert_eq!(nodes.get(SabrParameter::Nu, GridPoint::new(5.0, 2.0)), 3.0);
    }

    // ========================================
    // Black sensitivity
    // ========================================

    #[test]
    fn test_black_sensitivity_multiplies_inverse_jacobian() {
        let node = GridPoint::new(1.0, 2.0);
        let inverse = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 0.0, 0.0, 3.0, 4.0, 5.0, 6.0]);
        let sensitivity = SabrSensitivity::new()
            .with(SabrParameter::Alpha, node, 1.0)
            .with(SabrParameter::Rho, node, 10.0)
            .with(SabrParameter::Nu, node, 100.0);

        let black = SabrSensitivityRedistributor::new()
            .black_sensitivity(&sensitivity, &BTreeMap::from([(node, inverse)]))
            .unwrap();
        assert_eq!(black[&node], vec![1.0 + 30.0 + 500.0, 2.0 + 40.0 + 600.0]);
    }

    #[test]
    fn test_missing_inverse_jacobian_is_skipped() {
        let observed = GridPoint::new(1.0, 2.0);
        let unobserved = GridPoint::new(5.0, 10.0);
        let sensitivity = SabrSensitivity::new()
            .with(SabrParameter::Alpha, observed, 1.0)
            .with(SabrParameter::Alpha, unobserved, 1.0);
        let inverses = BTreeMap::from([(observed, DMatrix::from_element(4, 3, 1.0))]);

        let black = SabrSensitivityRedistributor::new()
            .black_sensitivity(&sensitivity, &inverses)
            .unwrap();
        assert_eq!(black.len(), 1);
        assert_eq!(black[&observed], vec![1.0; 3]);
    }

    #[test]
    fn test_zero_row_is_skipped() {
        let node = GridPoint::new(1.0, 2.0);
        let sensitivity = SabrSensitivity::new().with(SabrParameter::Beta, node, 0.0);
        let inverses = BTreeMap::from([(node, DMatrix::from_element(4, 3, 1.0))]);
        let black = SabrSensitivityRedistributor::new()
            .black_sensitivity(&sensitivity, &inverses)
            .unwrap();
        assert!(black.is_empty());
    }

    #[test]
    fn test_inverse_jacobian_shape_checked() {
        let node = GridPoint::new(1.0, 2.0);
        let sensitivity = SabrSensitivity::new().with(SabrParameter::Alpha, node, 1.0);
        let inverses = BTreeMap::from([(node, DMatrix::from_element(3, 3, 1.0))]);
        let err = SabrSensitivityRedistributor::new()
            .black_sensitivity(&sensitivity, &inverses)
            .unwrap_err();
        assert_eq!(err, RiskError::SabrJacobianShape { point: node, rows: 3 });
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }

    // ========================================
    // Property-based tests
    // ========================================

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn point_sensitivity() -> impl Strategy<Value = SabrSensitivity> {
            let entry = (0usize..4, 0.0f64..12.0, 0.0f64..15.0, -1e3f64..1e3);
            prop::collection::vec(entry, 1..12).prop_map(|entries| {
                entries
                    .into_iter()
                    .fold(SabrSensitivity::new(), |acc, (p, e, t, amount)| {
                        acc.with(SabrParameter::ALL[p], GridPoint::new(e, t), amount)
                    })
            })
        }

        proptest! {
            #[test]
            fn redistribution_is_additive(a in point_sensitivity(), b in point_sensitivity()) {
                let redistributor = SabrSensitivityRedistributor::new();
                let surfaces = surfaces(BTreeMap::new());

                let of_sum = redistributor
                    .calculate_node_sensitivities(&a.plus(&b), &surfaces)
                    .unwrap();
                let sum_of = redistributor
                    .calculate_node_sensitivities(&a, &surfaces)
                    .unwrap()
                    .plus(&redistributor.calculate_node_sensitivities(&b, &surfaces).unwrap());
                prop_assert!(of_sum.compare(&sum_of, 1e-9));
            }

            #[test]
            fn redistribution_preserves_total(a in point_sensitivity()) {
                let nodes = SabrSensitivityRedistributor::new()
                    .calculate_node_sensitivities(&a, &surfaces(BTreeMap::new()))
                    .unwrap();
                for parameter in SabrParameter::ALL {
                    let before: f64 = a.sensitivities(parameter).values().sum();
                    let after: f64 = nodes.sensitivities(parameter).values().sum();
                    prop_assert!((before - after).abs() < 1e-9);
                }
            }
        }
    }
}
