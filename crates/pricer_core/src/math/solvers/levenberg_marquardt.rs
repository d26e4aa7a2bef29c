//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! This module provides the [`LevenbergMarquardtSolver`] for solving nonlinear
//! least-squares problems commonly encountered in model calibration.
//!
//! # Algorithm
//!
//! The Levenberg-Marquardt algorithm combines Gauss-Newton and gradient descent:
//!
//! ```text
//! (J^T J + λ diag(J^T J)) δ = -J^T r
//! p_{n+1} = p_n + δ
//! ```
//!
//! where:
//! - `J` is the Jacobian matrix of residuals
//! - `r` is the residual vector
//! - `λ` is the damping factor (adjusted during iteration)
//! - `δ` is the parameter update step
//!
//! The Jacobian at the solution is kept on the result so that callers can
//! derive the sensitivity of the fitted parameters to the fitted data.
//!
//! # Example
//!
//! ```
//! use pricer_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//!
//! // Fit y = a * exp(-b * x) to data
//! let x_data = vec![0.0, 1.0, 2.0, 3.0, 4.0];
//! let y_data = vec![1.0, 0.37, 0.14, 0.05, 0.02];
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//!
//! // Residual function: model(x) - y
//! let residuals = |params: &[f64]| -> Vec<f64> {
//!     let a = params[0];
//!     let b = params[1];
//!     x_data.iter().zip(&y_data).map(|(&x, &y)| {
//!         a * (-b * x).exp() - y
//!     }).collect()
//! };
//!
//! let result = solver.solve(residuals, vec![1.0, 1.0]).unwrap();
//! assert!(result.converged);
//! ```

use crate::math::differentiation::central_difference_jacobian;
use crate::types::SolverError;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace, warn};

/// Bump used for the finite-difference Jacobian in parameter space.
const JACOBIAN_BUMP: f64 = 1e-7;

/// Configuration for Levenberg-Marquardt solver.
///
/// # Fields
///
/// * `tolerance` - Convergence tolerance for the residual norm
/// * `max_iterations` - Maximum number of iterations
/// * `initial_lambda` - Initial damping factor
/// * `lambda_up` - Factor to increase lambda when step is rejected
/// * `lambda_down` - Factor to decrease lambda when step is accepted
/// * `min_lambda` - Minimum value for lambda
/// * `max_lambda` - Maximum value for lambda
/// * `param_tolerance` - Relative step size treated as converged
/// * `gradient_tolerance` - Max-norm of `J^T r` treated as stationary
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LMConfig {
    /// Convergence tolerance for the residual norm.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor to increase lambda on rejected step.
    pub lambda_up: f64,
    /// Factor to decrease lambda on accepted step.
    pub lambda_down: f64,
    /// Minimum damping factor.
    pub min_lambda: f64,
    /// Maximum damping factor.
    pub max_lambda: f64,
    /// Tolerance for parameter change convergence.
    pub param_tolerance: f64,
    /// Tolerance for the gradient max-norm.
    pub gradient_tolerance: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e10,
            param_tolerance: 1e-12,
            gradient_tolerance: 1e-12,
        }
    }
}

impl LMConfig {
    /// Create a configuration with custom tolerance and iteration limit.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Loose tolerances for quick fits.
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 50,
            param_tolerance: 1e-8,
            ..Default::default()
        }
    }

    /// Tight tolerances for exact-fit problems.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            max_iterations: 500,
            param_tolerance: 1e-14,
            gradient_tolerance: 1e-14,
            ..Default::default()
        }
    }
}

/// Result of a Levenberg-Marquardt fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Fitted parameters.
    pub params: Vec<f64>,
    /// Sum of squared residuals at `params`.
    pub residual_ss: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met.
    pub converged: bool,
    /// Damping factor at termination.
    pub final_lambda: f64,
    /// Residual Jacobian `dr/dp` at `params` (residuals x parameters).
    pub jacobian: DMatrix<f64>,
}

impl LMResult {
    /// Root mean squared residual.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.residual_ss / n_observations as f64).sqrt()
    }

    /// Sensitivity of the fitted parameters to the residuals.
    ///
    /// Returns `(J^T J)^{-1} J^T` (parameters x residuals). For residuals of
    /// the form `(model - y_i) / σ_i` the sensitivity of the parameters to
    /// the data is this matrix with column `i` scaled by `1 / σ_i`.
    ///
    /// # Errors
    ///
    /// `SingularMatrix` if `J^T J` is not invertible (unidentifiable
    /// parameters).
    pub fn inverse_jacobian(&self) -> Result<DMatrix<f64>, SolverError> {
        let jt = self.jacobian.transpose();
        let jtj = &jt * &self.jacobian;
        let inv = jtj
            .try_inverse()
            .ok_or_else(|| SolverError::SingularMatrix {
                context: "least-squares normal matrix".to_string(),
            })?;
        Ok(inv * jt)
    }
}

/// Levenberg-Marquardt solver.
#[derive(Debug, Clone)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: LMConfig::default(),
        }
    }

    /// Solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Minimise `||residuals(p)||²` using a finite-difference Jacobian.
    ///
    /// A run that exhausts `max_iterations` or stalls at maximum damping
    /// away from a stationary point returns `converged == false`; callers
    /// decide whether that is fatal.
    ///
    /// # Errors
    ///
    /// * `NumericalInstability` - Empty parameters/residuals or non-finite
    ///   residuals at the initial guess
    pub fn solve<F>(&self, residuals: F, initial_params: Vec<f64>) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let jacobian = |p: &[f64]| {
            central_difference_jacobian(
                |q: &[f64]| Ok::<_, SolverError>(residuals(q)),
                p,
                JACOBIAN_BUMP,
            )
        };
        self.solve_with_jacobian(&residuals, jacobian, initial_params)
    }

    /// Minimise `||residuals(p)||²` with a caller-supplied Jacobian.
    pub fn solve_with_jacobian<F, J>(
        &self,
        residuals: F,
        jacobian: J,
        initial_params: Vec<f64>,
    ) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
        J: Fn(&[f64]) -> Result<DMatrix<f64>, SolverError>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }

        let mut params = DVector::from_vec(initial_params);
        let mut lambda = self.config.initial_lambda;

        let mut r = DVector::from_vec(residuals(params.as_slice()));
        if r.is_empty() {
            return Err(SolverError::NumericalInstability(
                "Empty residual vector".to_string(),
            ));
        }
        if r.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NumericalInstability(
                "Non-finite residuals at initial parameters".to_string(),
            ));
        }
        let mut ss = r.norm_squared();
        let mut jac = self.checked_jacobian(&jacobian, &params, r.len())?;

        let mut iteration = 0;
        let converged = loop {
            trace!(iteration, residual_ss = ss, lambda, "levenberg-marquardt iteration");
            if ss.sqrt() < self.config.tolerance {
                break true;
            }
            let gradient = jac.transpose() * &r;
            if gradient.amax() < self.config.gradient_tolerance {
                break true;
            }
            if iteration >= self.config.max_iterations {
                break false;
            }
            iteration += 1;

            let Some(delta) = Self::damped_step(&jac, &gradient, lambda) else {
                lambda *= self.config.lambda_up;
                if lambda > self.config.max_lambda {
                    break false;
                }
                continue;
            };

            let trial = &params + &delta;
            let trial_r = DVector::from_vec(residuals(trial.as_slice()));
            let trial_ss = if trial_r.len() == r.len() && trial_r.iter().all(|v| v.is_finite()) {
                trial_r.norm_squared()
            } else {
                f64::INFINITY
            };

            if trial_ss < ss {
                let tol = self.config.param_tolerance;
                let step_small = delta.norm() < tol * (params.norm() + tol);
                params = trial;
                r = trial_r;
                ss = trial_ss;
                jac = self.checked_jacobian(&jacobian, &params, r.len())?;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
                if step_small {
                    break true;
                }
            } else {
                lambda *= self.config.lambda_up;
                if lambda > self.config.max_lambda {
                    // No descent left at any damping: stationary up to rounding.
                    let gradient = jac.transpose() * &r;
                    break gradient.amax() < self.config.gradient_tolerance.sqrt();
                }
            }
        };

        if converged {
            debug!(iterations = iteration, residual_ss = ss, "levenberg-marquardt converged");
        } else {
            warn!(iterations = iteration, residual_ss = ss, "levenberg-marquardt did not converge");
        }

        Ok(LMResult {
            params: params.as_slice().to_vec(),
            residual_ss: ss,
            iterations: iteration,
            converged,
            final_lambda: lambda,
            jacobian: jac,
        })
    }

    fn checked_jacobian<J>(
        &self,
        jacobian: &J,
        params: &DVector<f64>,
        n_residuals: usize,
    ) -> Result<DMatrix<f64>, SolverError>
    where
        J: Fn(&[f64]) -> Result<DMatrix<f64>, SolverError>,
    {
        let jac = jacobian(params.as_slice())?;
        if jac.shape() != (n_residuals, params.len()) {
            return Err(SolverError::DimensionMismatch {
                expected: n_residuals * params.len(),
                got: jac.nrows() * jac.ncols(),
            });
        }
        Ok(jac)
    }

    /// Solve `(J^T J + λ diag(J^T J)) δ = -J^T r` by Cholesky.
    fn damped_step(
        jac: &DMatrix<f64>,
        gradient: &DVector<f64>,
        lambda: f64,
    ) -> Option<DVector<f64>> {
        let mut normal = jac.transpose() * jac;
        for i in 0..normal.nrows() {
            let d = normal[(i, i)];
            normal[(i, i)] = d + lambda * d.max(f64::EPSILON);
        }
        normal.cholesky().map(|chol| -chol.solve(gradient))
    }
}

impl Default for LevenbergMarquardtSolver {
    fn default() -> Self {
        Self::with_defaults()
    }
}
