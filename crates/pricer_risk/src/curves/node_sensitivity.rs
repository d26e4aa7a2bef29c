//! Continuous curve sensitivities onto calibration nodes.
//!
//! Two modes share one node layout ([`CalibrationNodeSet`]):
//!
//! - unknown curves: the curves are taken as given interpolated curves and
//!   node risk is `W · S`, the interpolation weights applied to the
//!   continuous sensitivities
//! - calibrated curves: the curves came out of a multi-curve solve and node
//!   risk is `(J⁻¹)ᵀ · (W · S)`, the sensitivity to each calibration quote

use crate::error::RiskError;
use nalgebra::{DMatrix, DVector};
use pricer_core::market_data::curves::CurveProvider;
use pricer_core::sensitivities::CurveSensitivity;
use pricer_models::calculators::CurveCalculator;
use pricer_models::instruments::RateInstrument;
use pricer_optimiser::bootstrapping::{CalibrationNodeSet, MultiCurveFinder, MultiCurveSolution};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How continuous sensitivities reach the nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformMode {
    /// Interpolation weights only.
    UnknownCurves,
    /// Interpolation weights followed by the transposed inverse Jacobian.
    Calibrated {
        /// `dx/dq` of the calibration at its solution
        inverse_jacobian: DMatrix<f64>,
    },
}

/// Maps continuous curve sensitivities to one entry per calibration node.
///
/// The output is ordered like the calibration parameter vector and always
/// has [`CalibrationNodeSet::total_nodes`] entries; nodes nothing refers
/// to hold exactly `0.0`. Sensitivities to curves outside the node set
/// (known curves) carry no node risk.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::curves::{CurveBundle, CurveInterpolation, CurveSet};
/// use pricer_core::sensitivities::CurveSensitivity;
/// use pricer_optimiser::bootstrapping::CalibrationNodeSet;
/// use pricer_risk::curves::NodeSensitivityTransformer;
///
/// let nodes = CalibrationNodeSet::new()
///     .with_curve("USD-OIS", vec![1.0, 2.0, 5.0], CurveInterpolation::Linear)
///     .unwrap();
/// let curves = CurveBundle::new(CurveSet::new(), nodes.build_curves(&[0.02, 0.025, 0.03]).unwrap()).unwrap();
///
/// let transformer = NodeSensitivityTransformer::unknown_curves(nodes);
/// let sensitivity = CurveSensitivity::from_curve("USD-OIS", vec![(1.5, -1.0)]);
/// let risk = transformer.curve_to_node_sensitivities(&sensitivity, &curves).unwrap();
///
/// assert_eq!(risk.as_slice(), &[-0.5, -0.5, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct NodeSensitivityTransformer {
    nodes: CalibrationNodeSet,
    mode: TransformMode,
}

impl NodeSensitivityTransformer {
    /// Transformer for curves taken directly from their node values.
    pub fn unknown_curves(nodes: CalibrationNodeSet) -> Self {
        Self {
            nodes,
            mode: TransformMode::UnknownCurves,
        }
    }

    /// Transformer for calibrated curves.
    ///
    /// # Errors
    ///
    /// `JacobianShape` unless `inverse_jacobian` is square with one row per
    /// node.
    pub fn calibrated(
        nodes: CalibrationNodeSet,
        inverse_jacobian: DMatrix<f64>,
    ) -> Result<Self, RiskError> {
        let n = nodes.total_nodes();
        if inverse_jacobian.shape() != (n, n) {
            return Err(RiskError::JacobianShape {
                rows: inverse_jacobian.nrows(),
                cols: inverse_jacobian.ncols(),
                nodes: n,
            });
        }
        Ok(Self {
            nodes,
            mode: TransformMode::Calibrated { inverse_jacobian },
        })
    }

    /// Calibrated transformer from a finder and the solution it produced.
    pub fn from_solution<C: CurveCalculator>(
        finder: &MultiCurveFinder<C>,
        solution: &MultiCurveSolution,
    ) -> Result<Self, RiskError> {
        Self::calibrated(finder.problem().nodes().clone(), solution.inverse_jacobian.clone())
    }

    /// Node layout.
    #[inline]
    pub fn nodes(&self) -> &CalibrationNodeSet {
        &self.nodes
    }

    /// Transform mode.
    #[inline]
    pub fn mode(&self) -> &TransformMode {
        &self.mode
    }

    /// Node sensitivities of `instrument` as valued by `calculator`.
    ///
    /// # Errors
    ///
    /// * `Instrument` - The calculator failed
    /// * `WrongNames` - See [`curve_to_node_sensitivities`](Self::curve_to_node_sensitivities)
    pub fn node_sensitivities<C: CurveCalculator + ?Sized>(
        &self,
        calculator: &C,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<DVector<f64>, RiskError> {
        let sensitivity = calculator.curve_sensitivity(instrument, curves)?;
        self.curve_to_node_sensitivities(&sensitivity, curves)
    }

    /// Node sensitivities from precomputed continuous sensitivities.
    ///
    /// # Errors
    ///
    /// * `WrongNames` - `sensitivity` refers to a curve missing from
    ///   `curves`, or a solved curve of the layout is missing
    /// * `Bootstrap` - The curve in `curves` does not fit the layout
    pub fn curve_to_node_sensitivities(
        &self,
        sensitivity: &CurveSensitivity,
        curves: &dyn CurveProvider,
    ) -> Result<DVector<f64>, RiskError> {
        self.check_names(sensitivity, curves)?;
        let weighted = self.nodes.project(sensitivity, curves)?;
        Ok(match &self.mode {
            TransformMode::UnknownCurves => weighted,
            TransformMode::Calibrated { inverse_jacobian } => inverse_jacobian.tr_mul(&weighted),
        })
    }

    /// Summed node sensitivities of a book of instruments.
    ///
    /// Instruments are processed concurrently with the `parallel` feature.
    pub fn portfolio_node_sensitivities<C: CurveCalculator>(
        &self,
        calculator: &C,
        instruments: &[RateInstrument],
        curves: &(dyn CurveProvider + Sync),
    ) -> Result<DVector<f64>, RiskError> {
        let per_instrument =
            |instrument: &RateInstrument| self.node_sensitivities(calculator, instrument, curves);
        #[cfg(feature = "parallel")]
        let risks: Result<Vec<_>, RiskError> = instruments.par_iter().map(per_instrument).collect();
        #[cfg(not(feature = "parallel"))]
        let risks: Result<Vec<_>, RiskError> = instruments.iter().map(per_instrument).collect();

        let total = risks?
            .into_iter()
            .fold(DVector::zeros(self.nodes.total_nodes()), |acc, risk| acc + risk);
        debug!(
            instruments = instruments.len(),
            nodes = total.len(),
            "portfolio node sensitivities"
        );
        Ok(total)
    }

    fn check_names(
        &self,
        sensitivity: &CurveSensitivity,
        curves: &dyn CurveProvider,
    ) -> Result<(), RiskError> {
        let missing: Vec<String> = sensitivity
            .curve_names()
            .chain(self.nodes.curve_names())
            .filter(|name| !curves.contains_curve(name))
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RiskError::wrong_names(missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::{CurveBundle, CurveEnum, CurveInterpolation, CurveSet};
    use pricer_core::types::ErrorCategory;
    use pricer_models::calculators::PresentValueCalculator;
    use pricer_models::instruments::Fra;

    fn nodes() -> CalibrationNodeSet {
        CalibrationNodeSet::new()
            .with_curve("DSC", vec![1.0, 2.0], CurveInterpolation::Linear)
            .unwrap()
            .with_curve("FWD", vec![0.5, 1.0, 3.0], CurveInterpolation::Linear)
            .unwrap()
    }

    fn bundle(known: CurveSet) -> CurveBundle {
        let solved = nodes().build_curves(&[0.02, 0.022, 0.025, 0.027, 0.03]).unwrap();
        CurveBundle::new(known, solved).unwrap()
    }

    // ========================================
    // Unknown-curve mode
    // ========================================

    #[test]
    fn test_output_covers_every_node() {
        let transformer = NodeSensitivityTransformer::unknown_curves(nodes());
        let sensitivity = CurveSensitivity::from_curve("FWD", vec![(0.75, 2.0)]);
        let risk = transformer
            .curve_to_node_sensitivities(&sensitivity, &bundle(CurveSet::new()))
            .unwrap();

        assert_eq!(risk.len(), 5);
        assert_eq!(risk[0], 0.0);
        assert_eq!(risk[1], 0.0);
        assert_relative_eq!(risk[2], 1.0, epsilon = 1e-15);
        assert_relative_eq!(risk[3], 1.0, epsilon = 1e-15);
        assert_eq!(risk[4], 0.0);
    }

    #[test]
    fn test_known_curve_sensitivity_is_dropped() {
        let mut known = CurveSet::new();
        known.insert("OIS", CurveEnum::flat(0.01));
        let transformer = NodeSensitivityTransformer::unknown_curves(nodes());
        let sensitivity = CurveSensitivity::from_curve("OIS", vec![(2.0, 5.0)]);

        let risk = transformer
            .curve_to_node_sensitivities(&sensitivity, &bundle(known))
            .unwrap();
        assert!(risk.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_instrument_path_matches_precomputed_path() {
        let curves = bundle(CurveSet::new());
        let fra: RateInstrument = Fra::new("DSC", "FWD", 0.5, 1.5, 0.03).unwrap().into();
        let transformer = NodeSensitivityTransformer::unknown_curves(nodes());

        let direct = transformer
            .node_sensitivities(&PresentValueCalculator, &fra, &curves)
            .unwrap();
        let precomputed = PresentValueCalculator.curve_sensitivity(&fra, &curves).unwrap();
        let via_curves = transformer.curve_to_node_sensitivities(&precomputed, &curves).unwrap();
        assert_eq!(direct, via_curves);
    }

    // ========================================
    // Names
    // ========================================

    #[test]
    fn test_unknown_sensitivity_curve() {
        let transformer = NodeSensitivityTransformer::unknown_curves(nodes());
        let sensitivity = CurveSensitivity::from_curve("EUR", vec![(1.0, 1.0)]);
        let err = transformer
            .curve_to_node_sensitivities(&sensitivity, &bundle(CurveSet::new()))
            .unwrap_err();
        assert_eq!(err, RiskError::wrong_names(vec!["EUR".to_string()]));
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }

    #[test]
    fn test_layout_curve_missing_from_bundle() {
        let transformer = NodeSensitivityTransformer::unknown_curves(nodes());
        let mut only_dsc = CurveSet::new();
        only_dsc.insert("DSC", CurveEnum::flat(0.02));
        let sensitivity = CurveSensitivity::from_curve("DSC", vec![(1.0, 1.0)]);

        let err = transformer.curve_to_node_sensitivities(&sensitivity, &only_dsc).unwrap_err();
        assert_eq!(err, RiskError::wrong_names(vec!["FWD".to_string()]));
    }

    // ========================================
    // Calibrated mode
    // ========================================

    #[test]
    fn test_calibrated_applies_transposed_inverse() {
        let inverse = DMatrix::from_fn(5, 5, |i, j| match j {
            _ if j == i => 2.0,
            _ if j == i + 1 => 1.0,
            _ => 0.0,
        });
        let transformer = NodeSensitivityTransformer::calibrated(nodes(), inverse).unwrap();
        let sensitivity = CurveSensitivity::from_curve("DSC", vec![(1.0, 1.0)]);

        let risk = transformer
            .curve_to_node_sensitivities(&sensitivity, &bundle(CurveSet::new()))
            .unwrap();
        // w = e_0, so the result is row 0 of the inverse
        assert_eq!(risk.as_slice(), &[2.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_calibrated_shape_check() {
        let err =
            NodeSensitivityTransformer::calibrated(nodes(), DMatrix::identity(4, 4)).unwrap_err();
        assert_eq!(
            err,
            RiskError::JacobianShape {
                rows: 4,
                cols: 4,
                nodes: 5
            }
        );
        assert_eq!(err.category(), ErrorCategory::InvalidConfiguration);
    }

    // ========================================
    // Portfolio
    // ========================================

    #[test]
    fn test_portfolio_is_sum_of_trades() {
        let curves = bundle(CurveSet::new());
        let transformer = NodeSensitivityTransformer::unknown_curves(nodes());
        let book: Vec<RateInstrument> = vec![
            Fra::new("DSC", "FWD", 0.5, 1.0, 0.03).unwrap().into(),
            Fra::new("DSC", "FWD", 1.0, 2.5, 0.03).unwrap().into(),
        ];

        let total = transformer
            .portfolio_node_sensitivities(&PresentValueCalculator, &book, &curves)
            .unwrap();
        let expected = book
            .iter()
            .map(|i| transformer.node_sensitivities(&PresentValueCalculator, i, &curves).unwrap())
            .fold(DVector::zeros(5), |acc, r| acc + r);
        for (a, b) in total.iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-15);
        }
    }
}
