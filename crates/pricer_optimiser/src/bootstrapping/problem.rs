//! Validated input of a multi-curve calibration.

use super::error::BootstrapError;
use super::nodes::CalibrationNodeSet;
use pricer_core::market_data::curves::CurveSet;
use pricer_core::market_data::FxMatrix;
use pricer_models::instruments::RateInstrument;

/// Instruments, targets, node layout and fixed curves of one calibration.
///
/// All structural checks happen here, so a problem that exists can be
/// handed to the solver without further validation:
///
/// - one target per instrument
/// - as many instruments as nodes
/// - no curve both known and solved
/// - every curve an instrument uses is either known or solved
///
/// Instruments in more than one currency, such as FX forwards, read spot
/// rates from the attached [`FxMatrix`] and are valued in their own
/// domestic currency, so every residual is in one currency.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, CurveInterpolation, CurveSet};
/// use pricer_models::instruments::{Fra, RateInstrument};
/// use pricer_optimiser::bootstrapping::{BootstrapError, CalibrationNodeSet, MultiCurveProblem};
///
/// let mut known = CurveSet::new();
/// known.insert("DSC", CurveEnum::flat(0.02));
///
/// let fras: Vec<RateInstrument> = [(0.5, 1.0), (1.0, 1.5)]
///     .iter()
///     .map(|&(s, e)| Fra::new("DSC", "FWD", s, e, 0.025).unwrap().into())
///     .collect();
/// let nodes = CalibrationNodeSet::new()
///     .with_curve("FWD", vec![1.0, 1.5], CurveInterpolation::Linear)
///     .unwrap();
///
/// assert!(MultiCurveProblem::at_quotes(fras.clone(), nodes.clone(), known).is_ok());
///
/// // Without the discount curve the FRAs cannot be priced
/// let err = MultiCurveProblem::at_quotes(fras, nodes, CurveSet::new()).unwrap_err();
/// assert!(matches!(err, BootstrapError::UnknownCurve { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct MultiCurveProblem {
    instruments: Vec<RateInstrument>,
    targets: Vec<f64>,
    nodes: CalibrationNodeSet,
    known: CurveSet,
    fx: Option<FxMatrix>,
}

impl MultiCurveProblem {
    /// Problem with explicit targets.
    ///
    /// # Errors
    ///
    /// * `TargetCountMismatch` - `targets.len() != instruments.len()`
    /// * `NodeCountMismatch` - `instruments.len() != nodes.total_nodes()`
    /// * `DuplicateCurve` - A solved curve is also known
    /// * `UnknownCurve` - An instrument uses a curve that is neither
    pub fn new(
        instruments: Vec<RateInstrument>,
        targets: Vec<f64>,
        nodes: CalibrationNodeSet,
        known: CurveSet,
    ) -> Result<Self, BootstrapError> {
        if targets.len() != instruments.len() {
            return Err(BootstrapError::TargetCountMismatch {
                instruments: instruments.len(),
                targets: targets.len(),
            });
        }
        if instruments.len() != nodes.total_nodes() {
            return Err(BootstrapError::node_count_mismatch(instruments.len(), nodes.total_nodes()));
        }
        if let Some(name) = nodes.curve_names().find(|name| known.contains(name)) {
            return Err(BootstrapError::duplicate_curve(name));
        }
        for (index, instrument) in instruments.iter().enumerate() {
            if let Some(name) = instrument
                .curve_names()
                .into_iter()
                .find(|name| !nodes.contains(name) && !known.contains(name))
            {
                return Err(BootstrapError::UnknownCurve {
                    index,
                    name: name.to_string(),
                });
            }
        }
        Ok(Self {
            instruments,
            targets,
            nodes,
            known,
            fx: None,
        })
    }

    /// Attach the spot rates used to value cross-currency instruments.
    pub fn with_fx_matrix(mut self, fx: FxMatrix) -> Self {
        self.fx = Some(fx);
        self
    }

    /// Problem whose targets are the instruments' own quoted rates.
    ///
    /// Pairs with a par-rate calculator: each instrument must reprice to
    /// its quote.
    pub fn at_quotes(
        instruments: Vec<RateInstrument>,
        nodes: CalibrationNodeSet,
        known: CurveSet,
    ) -> Result<Self, BootstrapError> {
        let targets = instruments.iter().map(RateInstrument::rate).collect();
        Self::new(instruments, targets, nodes, known)
    }

    /// Problem with every target zero.
    ///
    /// Pairs with a present-value calculator: each instrument must be
    /// worth nothing at its quote.
    pub fn at_zero_value(
        instruments: Vec<RateInstrument>,
        nodes: CalibrationNodeSet,
        known: CurveSet,
    ) -> Result<Self, BootstrapError> {
        let targets = vec![0.0; instruments.len()];
        Self::new(instruments, targets, nodes, known)
    }

    /// Same problem with targets replaced.
    ///
    /// # Errors
    ///
    /// `TargetCountMismatch` if the length differs.
    pub fn with_targets(&self, targets: Vec<f64>) -> Result<Self, BootstrapError> {
        if targets.len() != self.instruments.len() {
            return Err(BootstrapError::TargetCountMismatch {
                instruments: self.instruments.len(),
                targets: targets.len(),
            });
        }
        Ok(Self {
            targets,
            ..self.clone()
        })
    }

    /// Calibration instruments.
    #[inline]
    pub fn instruments(&self) -> &[RateInstrument] {
        &self.instruments
    }

    /// Target value of each instrument.
    #[inline]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// Node layout of the solved curves.
    #[inline]
    pub fn nodes(&self) -> &CalibrationNodeSet {
        &self.nodes
    }

    /// Curves held fixed.
    #[inline]
    pub fn known(&self) -> &CurveSet {
        &self.known
    }

    /// Spot rates, if attached.
    #[inline]
    pub fn fx_matrix(&self) -> Option<&FxMatrix> {
        self.fx.as_ref()
    }

    /// Number of unknowns.
    #[inline]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether there is nothing to solve.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::market_data::curves::{CurveEnum, CurveInterpolation};
    use pricer_core::types::{Currency, ErrorCategory};
    use pricer_models::instruments::Cash;

    fn deposits(curve: &str, times: &[f64]) -> Vec<RateInstrument> {
        times
            .iter()
            .map(|&t| Cash::new(curve, 0.0, t, 0.05).unwrap().into())
            .collect()
    }

    fn nodes(curve: &str, times: &[f64]) -> CalibrationNodeSet {
        CalibrationNodeSet::new()
            .with_curve(curve, times.to_vec(), CurveInterpolation::Linear)
            .unwrap()
    }

    fn two_deposits() -> MultiCurveProblem {
        let (instruments, nodes) = (deposits("DSC", &[1.0, 2.0]), nodes("DSC", &[1.0, 2.0]));
        MultiCurveProblem::at_quotes(instruments, nodes, CurveSet::new()).unwrap()
    }

    // ========================================
    // Construction
    // ========================================

    #[test]
    fn test_at_quotes_uses_instrument_rates() {
        let problem = two_deposits();
        assert_eq!(problem.targets(), &[0.05, 0.05]);
        assert_eq!(problem.len(), 2);
    }

    #[test]
    fn test_at_zero_value() {
        let problem = MultiCurveProblem::at_zero_value(
            deposits("DSC", &[1.0, 2.0]),
            nodes("DSC", &[1.0, 2.0]),
            CurveSet::new(),
        )
        .unwrap();
        assert_eq!(problem.targets(), &[0.0, 0.0]);
    }

    // ========================================
    // Validation
    // ========================================

    #[test]
    fn test_wrong_number_of_nodes() {
        let err = MultiCurveProblem::at_quotes(
            deposits("DSC", &[1.0, 2.0, 3.0]),
            nodes("DSC", &[1.0, 2.0]),
            CurveSet::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("wrong number of nodes"));
        assert_eq!(err.category(), ErrorCategory::InvalidConfiguration);
    }

    #[test]
    fn test_target_count_mismatch() {
        let err = MultiCurveProblem::new(
            deposits("DSC", &[1.0, 2.0]),
            vec![0.05],
            nodes("DSC", &[1.0, 2.0]),
            CurveSet::new(),
        )
        .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }

    #[test]
    fn test_known_and_solved_clash() {
        let mut known = CurveSet::new();
        known.insert("DSC", CurveEnum::flat(0.01));
        let (instruments, nodes) = (deposits("DSC", &[1.0, 2.0]), nodes("DSC", &[1.0, 2.0]));
        let err = MultiCurveProblem::at_quotes(instruments, nodes, known).unwrap_err();
        assert_eq!(err, BootstrapError::duplicate_curve("DSC"));
        assert_eq!(err.category(), ErrorCategory::InvalidConfiguration);
    }

    #[test]
    fn test_unknown_curve() {
        let mut instruments = deposits("DSC", &[1.0]);
        instruments.extend(deposits("EUR", &[2.0]));
        let nodes = nodes("DSC", &[1.0, 2.0]);
        let err = MultiCurveProblem::at_quotes(instruments, nodes, CurveSet::new()).unwrap_err();
        assert_eq!(
            err,
            BootstrapError::UnknownCurve {
                index: 1,
                name: "EUR".to_string()
            }
        );
    }

    #[test]
    fn test_with_targets() {
        let problem = two_deposits();
        let bumped = problem.with_targets(vec![0.05, 0.0501]).unwrap();
        assert_eq!(bumped.targets(), &[0.05, 0.0501]);
        assert!(problem.with_targets(vec![0.05]).is_err());
    }

    #[test]
    fn test_fx_matrix_survives_new_targets() {
        let fx = FxMatrix::new()
            .with_currency(Currency::EUR, Currency::USD, 1.1)
            .unwrap();
        let problem = two_deposits();
        assert!(problem.fx_matrix().is_none());
        let problem = problem.with_fx_matrix(fx.clone());
        let bumped = problem.with_targets(vec![0.05, 0.0501]).unwrap();
        assert_eq!(bumped.fx_matrix(), Some(&fx));
    }
}
