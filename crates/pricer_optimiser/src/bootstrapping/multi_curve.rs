//! Simultaneous root finding for several curves.
//!
//! Every node of every solved curve is one unknown, every calibration
//! instrument one equation:
//!
//! ```text
//! f_i(x) = value(instrument_i, curves(x)) - target_i
//! ```
//!
//! The system is solved with vector Newton. Row `i` of the analytic
//! Jacobian is the instrument's continuous zero-rate sensitivity pushed
//! onto the nodes through each curve's interpolation weights (`J = W · S`).
//! Known curves feed every valuation but contribute no columns.

use super::config::{JacobianMode, MultiCurveConfig};
use super::error::BootstrapError;
use super::problem::MultiCurveProblem;
use nalgebra::{DMatrix, DVector};
use pricer_core::market_data::curves::{CurveBundle, CurveEnum, CurveProvider, CurveSet};
use pricer_core::market_data::{FxMatrix, MarketDataError};
use pricer_core::math::differentiation::central_difference_jacobian;
use pricer_core::math::solvers::NewtonRaphsonSolver;
use pricer_core::types::SolverError;
use pricer_models::calculators::CurveCalculator;
use pricer_models::instruments::RateInstrument;
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Solved curves over borrowed known curves, without copying either.
struct CurveView<'a> {
    solved: &'a CurveSet,
    known: &'a CurveSet,
    fx: Option<&'a FxMatrix>,
}

impl CurveProvider for CurveView<'_> {
    fn curve(&self, name: &str) -> Result<&CurveEnum, MarketDataError> {
        self.solved
            .get(name)
            .or_else(|| self.known.get(name))
            .ok_or_else(|| MarketDataError::CurveNotFound {
                name: name.to_string(),
            })
    }

    fn fx_matrix(&self) -> Option<&FxMatrix> {
        self.fx
    }
}

/// Result of a successful calibration.
#[derive(Debug, Clone)]
pub struct MultiCurveSolution {
    /// Node values in layout order.
    pub parameters: DVector<f64>,
    /// Known curves and the calibrated curves.
    pub curves: CurveBundle,
    /// `df/dx` at the solution.
    pub jacobian: DMatrix<f64>,
    /// `dx/df`, the inverse of [`jacobian`](Self::jacobian).
    ///
    /// Column `i` is the response of every node to a unit move in target
    /// `i`, i.e. the quote sensitivity of the nodes.
    pub inverse_jacobian: DMatrix<f64>,
    /// Newton iterations taken.
    pub iterations: usize,
    /// Residual norm at the solution.
    pub residual_norm: f64,
}

/// Newton solver over a [`MultiCurveProblem`].
///
/// # Type Parameters
///
/// * `C` - Calculator valuing each instrument (par rate or present value)
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::curves::{CurveInterpolation, CurveSet, YieldCurve, CurveProvider};
/// use pricer_models::calculators::ParRateCalculator;
/// use pricer_models::instruments::{Cash, RateInstrument};
/// use pricer_optimiser::bootstrapping::{CalibrationNodeSet, MultiCurveConfig, MultiCurveFinder, MultiCurveProblem};
///
/// let times = [1.0, 2.0];
/// let deposits: Vec<RateInstrument> = times
///     .iter()
///     .map(|&t| Cash::new("DSC", 0.0, t, 0.04).unwrap().into())
///     .collect();
/// let nodes = CalibrationNodeSet::new()
///     .with_curve("DSC", times.to_vec(), CurveInterpolation::Linear)
///     .unwrap();
///
/// let problem = MultiCurveProblem::at_quotes(deposits, nodes, CurveSet::new()).unwrap();
/// let finder = MultiCurveFinder::new(problem, ParRateCalculator)
///     .with_config(MultiCurveConfig::high_precision());
/// let solution = finder.solve().unwrap();
///
/// let r1 = solution.curves.curve("DSC").unwrap().zero_rate(1.0).unwrap();
/// assert!((r1 - 1.04_f64.ln()).abs() < 1e-14);
/// ```
#[derive(Debug, Clone)]
pub struct MultiCurveFinder<C: CurveCalculator> {
    problem: MultiCurveProblem,
    calculator: C,
    config: MultiCurveConfig,
}

impl<C: CurveCalculator> MultiCurveFinder<C> {
    /// Finder with the default configuration.
    pub fn new(problem: MultiCurveProblem, calculator: C) -> Self {
        Self {
            problem,
            calculator,
            config: MultiCurveConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: MultiCurveConfig) -> Self {
        self.config = config;
        self
    }

    /// The calibration problem.
    #[inline]
    pub fn problem(&self) -> &MultiCurveProblem {
        &self.problem
    }

    /// The instrument calculator.
    #[inline]
    pub fn calculator(&self) -> &C {
        &self.calculator
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &MultiCurveConfig {
        &self.config
    }

    /// Known curves together with the solved curves at `x`.
    ///
    /// # Errors
    ///
    /// `MarketData` if `x` has the wrong length.
    pub fn build_curves(&self, x: &DVector<f64>) -> Result<CurveBundle, BootstrapError> {
        let solved = self.problem.nodes().build_curves(x.as_slice())?;
        let bundle = CurveBundle::new(self.problem.known().clone(), solved)?;
        Ok(match self.problem.fx_matrix() {
            Some(fx) => bundle.with_fx_matrix(fx.clone()),
            None => bundle,
        })
    }

    /// Residuals `value_i(x) - target_i`.
    pub fn evaluate(&self, x: &DVector<f64>) -> Result<DVector<f64>, BootstrapError> {
        let solved = self.problem.nodes().build_curves(x.as_slice())?;
        let curves = CurveView {
            solved: &solved,
            known: self.problem.known(),
            fx: self.problem.fx_matrix(),
        };
        let values =
            self.per_instrument(|instrument| Ok(self.calculator.value(instrument, &curves)?))?;
        Ok(DVector::from_iterator(
            values.len(),
            values.iter().zip(self.problem.targets()).map(|(v, t)| v - t),
        ))
    }

    /// `df_i/dx_j`, computed as configured.
    pub fn evaluate_jacobian(&self, x: &DVector<f64>) -> Result<DMatrix<f64>, BootstrapError> {
        match self.config.jacobian {
            JacobianMode::Analytic => self.analytic_jacobian(x),
            JacobianMode::FiniteDifference { bump } => self.finite_difference_jacobian(x, bump),
        }
    }

    /// Jacobian from instrument curve sensitivities, `J = W · S`.
    pub fn analytic_jacobian(&self, x: &DVector<f64>) -> Result<DMatrix<f64>, BootstrapError> {
        let nodes = self.problem.nodes();
        let solved = nodes.build_curves(x.as_slice())?;
        let curves = CurveView {
            solved: &solved,
            known: self.problem.known(),
            fx: self.problem.fx_matrix(),
        };
        let rows = self.per_instrument(|instrument| {
            let sensitivity = self.calculator.curve_sensitivity(instrument, &curves)?;
            nodes.project(&sensitivity, &curves)
        })?;

        let n = nodes.total_nodes();
        let mut jacobian = DMatrix::zeros(rows.len(), n);
        for (i, row) in rows.iter().enumerate() {
            jacobian.set_row(i, &row.transpose());
        }
        Ok(jacobian)
    }

    /// Central-difference Jacobian of [`evaluate`](Self::evaluate).
    pub fn finite_difference_jacobian(
        &self,
        x: &DVector<f64>,
        bump: f64,
    ) -> Result<DMatrix<f64>, BootstrapError> {
        central_difference_jacobian(
            |p: &[f64]| {
                self.evaluate(&DVector::from_column_slice(p))
                    .map(|f| f.as_slice().to_vec())
            },
            x.as_slice(),
            bump,
        )
    }

    /// Solve from a flat initial guess of
    /// [`initial_rate`](MultiCurveConfig::initial_rate).
    pub fn solve(&self) -> Result<MultiCurveSolution, BootstrapError> {
        let n = self.problem.nodes().total_nodes();
        self.solve_from(DVector::from_element(n, self.config.initial_rate))
    }

    /// Solve from `initial`.
    ///
    /// # Errors
    ///
    /// * `ConvergenceFailure` - Newton ran out of iterations, stalled, or
    ///   left the residual norm at or above the solver tolerance
    /// * `Solver` - Singular Jacobian or non-finite residuals
    /// * `MarketData`, `Instrument` - Valuation failures
    pub fn solve_from(&self, initial: DVector<f64>) -> Result<MultiCurveSolution, BootstrapError> {
        debug!(
            curves = self.problem.nodes().len(),
            nodes = initial.len(),
            "solving multi-curve problem"
        );
        let solver = NewtonRaphsonSolver::new(self.config.solver);
        let result = solver
            .solve(|x| self.evaluate(x), |x| self.evaluate_jacobian(x), initial)
            .map_err(|e| match e {
                BootstrapError::Solver(SolverError::MaxIterationsExceeded {
                    iterations,
                    residual,
                }) => BootstrapError::convergence_failure(residual, iterations),
                other => other,
            })?;
        if !(result.residual_norm < self.config.solver.tolerance) {
            warn!(
                residual = result.residual_norm,
                tolerance = self.config.solver.tolerance,
                "solver returned residuals above tolerance"
            );
            return Err(BootstrapError::convergence_failure(
                result.residual_norm,
                result.iterations,
            ));
        }

        let inverse_jacobian = result
            .jacobian
            .clone()
            .try_inverse()
            .ok_or_else(|| SolverError::SingularMatrix {
                context: "calibration jacobian at solution".to_string(),
            })?;
        let curves = self.build_curves(&result.root)?;

        debug!(
            iterations = result.iterations,
            residual = result.residual_norm,
            "multi-curve problem solved"
        );
        Ok(MultiCurveSolution {
            parameters: result.root,
            curves,
            jacobian: result.jacobian,
            inverse_jacobian,
            iterations: result.iterations,
            residual_norm: result.residual_norm,
        })
    }

    fn per_instrument<T, F>(&self, f: F) -> Result<Vec<T>, BootstrapError>
    where
        T: Send,
        F: Fn(&RateInstrument) -> Result<T, BootstrapError> + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            self.problem.instruments().par_iter().map(f).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.problem.instruments().iter().map(f).collect()
        }
    }
}

/// Solve independent problems, in parallel when the `parallel` feature is on.
///
/// Each problem owns its curves and Jacobian; results come back in input
/// order.
pub fn solve_all<C: CurveCalculator>(
    finders: &[MultiCurveFinder<C>],
) -> Vec<Result<MultiCurveSolution, BootstrapError>> {
    #[cfg(feature = "parallel")]
    {
        finders.par_iter().map(MultiCurveFinder::solve).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        finders.iter().map(MultiCurveFinder::solve).collect()
    }
}
