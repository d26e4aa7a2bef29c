//! Newton-Raphson root finding for vector functions.

use super::SolverConfig;
use crate::types::SolverError;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace, warn};

/// Step fractions tried before a non-improving Newton step is taken anyway.
const MAX_BACKTRACKS: usize = 8;

/// Outcome of a converged Newton solve.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonResult {
    /// Root `x` with `f(x) ≈ 0`.
    pub root: DVector<f64>,
    /// Residual vector at the root.
    pub residuals: DVector<f64>,
    /// Euclidean norm of the residuals.
    pub residual_norm: f64,
    /// Jacobian `df/dx` evaluated at the root.
    pub jacobian: DMatrix<f64>,
    /// Number of Newton steps taken.
    pub iterations: usize,
}

/// Newton-Raphson solver for square systems `f(x) = 0`.
///
/// Iterates `x_{n+1} = x_n - λ J(x_n)^{-1} f(x_n)` where `λ` starts at 1
/// and is halved while the step increases `||f||`. Converges only when
/// `||f|| < tolerance`. A step shorter than `step_tolerance * (1 + ||x||)`
/// with the residual still above tolerance means the iteration has
/// stalled, which is reported like running out of iterations. A failed
/// solve is always an error, never a silently returned iterate.
///
/// # Example
///
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use pricer_core::math::solvers::{NewtonRaphsonSolver, SolverConfig};
/// use pricer_core::types::SolverError;
///
/// // x² = 2, x·y = 1
/// let f = |x: &DVector<f64>| -> Result<DVector<f64>, SolverError> {
///     Ok(DVector::from_vec(vec![x[0] * x[0] - 2.0, x[0] * x[1] - 1.0]))
/// };
/// let jac = |x: &DVector<f64>| -> Result<DMatrix<f64>, SolverError> {
///     Ok(DMatrix::from_row_slice(2, 2, &[2.0 * x[0], 0.0, x[1], x[0]]))
/// };
///
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
/// let result = solver.solve(f, jac, DVector::from_vec(vec![1.0, 1.0])).unwrap();
/// assert!((result.root[0] - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewtonRaphsonSolver {
    config: SolverConfig,
}

impl NewtonRaphsonSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find a root of `f` starting from `initial`.
    ///
    /// `f` and `jacobian` may fail with any error type that can absorb a
    /// [`SolverError`]; their errors are propagated unchanged.
    ///
    /// # Errors
    ///
    /// * `DimensionMismatch` - `f` or `jacobian` returned the wrong shape
    /// * `SingularMatrix` - The Jacobian could not be inverted
    /// * `NumericalInstability` - Non-finite residuals
    /// * `MaxIterationsExceeded` - No convergence within `max_iterations`,
    ///   or the step stalled with `||f||` above tolerance
    pub fn solve<F, J, E>(
        &self,
        mut f: F,
        mut jacobian: J,
        initial: DVector<f64>,
    ) -> Result<NewtonResult, E>
    where
        F: FnMut(&DVector<f64>) -> Result<DVector<f64>, E>,
        J: FnMut(&DVector<f64>) -> Result<DMatrix<f64>, E>,
        E: From<SolverError>,
    {
        let n = initial.len();
        let mut x = initial;
        let mut fx = Self::checked(f(&x)?, n)?;
        let mut norm = fx.norm();

        for iteration in 0..self.config.max_iterations {
            trace!(iteration, residual = norm, "newton iteration");
            if norm < self.config.tolerance {
                return Self::converged(&mut jacobian, x, fx, norm, iteration);
            }

            let jac = jacobian(&x)?;
            if jac.shape() != (n, n) {
                return Err(SolverError::DimensionMismatch {
                    expected: n,
                    got: jac.nrows().max(jac.ncols()),
                }
                .into());
            }
            let step = jac.lu().solve(&fx).ok_or_else(|| SolverError::SingularMatrix {
                context: format!("newton step at iteration {}", iteration),
            })?;

            let mut lambda = 1.0;
            let mut trial_x = &x - &step;
            let mut trial_f = Self::checked(f(&trial_x)?, n)?;
            for _ in 0..MAX_BACKTRACKS {
                if trial_f.norm() < norm {
                    break;
                }
                lambda *= 0.5;
                trial_x = &x - &step * lambda;
                trial_f = Self::checked(f(&trial_x)?, n)?;
            }

            let step_norm = lambda * step.norm();
            x = trial_x;
            fx = trial_f;
            norm = fx.norm();

            if norm < self.config.tolerance {
                return Self::converged(&mut jacobian, x, fx, norm, iteration + 1);
            }
            if step_norm < self.config.step_tolerance * (1.0 + x.norm()) {
                warn!(
                    iterations = iteration + 1,
                    residual = norm,
                    step = step_norm,
                    "newton step stalled above tolerance"
                );
                return Err(SolverError::MaxIterationsExceeded {
                    iterations: iteration + 1,
                    residual: norm,
                }
                .into());
            }
        }

        warn!(
            iterations = self.config.max_iterations,
            residual = norm,
            "newton solver did not converge"
        );
        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
            residual: norm,
        }
        .into())
    }

    fn checked<E: From<SolverError>>(fx: DVector<f64>, n: usize) -> Result<DVector<f64>, E> {
        if fx.len() != n {
            return Err(SolverError::DimensionMismatch {
                expected: n,
                got: fx.len(),
            }
            .into());
        }
        if fx.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::NumericalInstability(
                "newton iteration produced non-finite residuals".to_string(),
            )
            .into());
        }
        Ok(fx)
    }

    fn converged<J, E>(
        jacobian: &mut J,
        root: DVector<f64>,
        residuals: DVector<f64>,
        residual_norm: f64,
        iterations: usize,
    ) -> Result<NewtonResult, E>
    where
        J: FnMut(&DVector<f64>) -> Result<DMatrix<f64>, E>,
    {
        debug!(iterations, residual = residual_norm, "newton solver converged");
        let jacobian = jacobian(&root)?;
        Ok(NewtonResult {
            root,
            residuals,
            residual_norm,
            jacobian,
            iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;
    use approx::assert_relative_eq;

    type Res<T> = Result<T, SolverError>;

    fn quadratic_system() -> (
        impl FnMut(&DVector<f64>) -> Res<DVector<f64>>,
        impl FnMut(&DVector<f64>) -> Res<DMatrix<f64>>,
    ) {
        let f = |x: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[0] - 4.0, x[0] + x[1] - 3.0]))
        };
        let j = |x: &DVector<f64>| -> Res<DMatrix<f64>> {
            Ok(DMatrix::from_row_slice(2, 2, &[2.0 * x[0], 0.0, 1.0, 1.0]))
        };
        (f, j)
    }

    // ========================================
    // Convergence
    // ========================================

    #[test]
    fn test_solves_quadratic_system() {
        let (f, j) = quadratic_system();
        let solver = NewtonRaphsonSolver::default();
        let result = solver.solve(f, j, DVector::from_vec(vec![1.0, 0.0])).unwrap();
        assert_relative_eq!(result.root[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(result.root[1], 1.0, epsilon = 1e-10);
        assert!(result.residual_norm < 1e-10);
        assert_relative_eq!(result.jacobian[(0, 0)], 4.0, epsilon = 1e-8);
    }

    #[test]
    fn test_linear_system_converges_in_one_step() {
        let f = |x: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![2.0 * x[0] - 1.0, 3.0 * x[1] + 6.0]))
        };
        let j = |_: &DVector<f64>| -> Res<DMatrix<f64>> {
            Ok(DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]))
        };
        let result = NewtonRaphsonSolver::default()
            .solve(f, j, DVector::zeros(2))
            .unwrap();
        assert!(result.iterations <= 2);
        assert_relative_eq!(result.root[0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(result.root[1], -2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_already_at_root() {
        let (f, j) = quadratic_system();
        let result = NewtonRaphsonSolver::default()
            .solve(f, j, DVector::from_vec(vec![2.0, 1.0]))
            .unwrap();
        assert_eq!(result.iterations, 0);
    }

    // ========================================
    // Failure modes
    // ========================================

    #[test]
    fn test_max_iterations_reported() {
        // x² + 1 = 0 has no real root
        let f = |x: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[0] + 1.0]))
        };
        let j = |x: &DVector<f64>| -> Res<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };
        let solver = NewtonRaphsonSolver::new(SolverConfig::new(1e-12, 5));
        let err = solver.solve(f, j, DVector::from_vec(vec![0.5])).unwrap_err();
        assert!(matches!(
            err,
            SolverError::MaxIterationsExceeded { iterations: 5, .. }
                | SolverError::SingularMatrix { .. }
        ));
    }

    #[test]
    fn test_stalled_step_with_large_residual_fails() {
        // 1e30·x² + 1 has no real root; the first step lands on x = 0
        let f = |x: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![1e30 * x[0] * x[0] + 1.0]))
        };
        let j = |x: &DVector<f64>| -> Res<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2e30 * x[0]))
        };
        let err = NewtonRaphsonSolver::default()
            .solve(f, j, DVector::from_vec(vec![1e-15]))
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::CalibrationFailure);
        match err {
            SolverError::MaxIterationsExceeded { iterations, residual } => {
                assert_eq!(iterations, 1);
                assert_relative_eq!(residual, 1.0, epsilon = 1e-12);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_singular_jacobian() {
        let f = |x: &DVector<f64>| -> Res<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] + x[1] - 1.0, x[0] + x[1] - 2.0]))
        };
        let j = |_: &DVector<f64>| -> Res<DMatrix<f64>> { Ok(DMatrix::from_element(2, 2, 1.0)) };
        let err = NewtonRaphsonSolver::default()
            .solve(f, j, DVector::zeros(2))
            .unwrap_err();
        assert!(matches!(err, SolverError::SingularMatrix { .. }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let f = |_: &DVector<f64>| -> Res<DVector<f64>> { Ok(DVector::from_vec(vec![1.0])) };
        let j = |_: &DVector<f64>| -> Res<DMatrix<f64>> { Ok(DMatrix::identity(2, 2)) };
        let err = NewtonRaphsonSolver::default()
            .solve(f, j, DVector::zeros(2))
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::DimensionMismatch { expected: 2, got: 1 }
        ));
    }
}
