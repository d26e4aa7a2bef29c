//! Solver configuration types.

/// Configuration for the vector Newton-Raphson solver.
///
/// # Fields
///
/// * `tolerance` - Convergence threshold on the residual norm `||f(x)||`
/// * `step_tolerance` - Stall threshold on the step, relative to `1 + ||x||`
/// * `max_iterations` - Maximum Newton iterations before reporting failure
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.max_iterations, 100);
///
/// let tight = SolverConfig::high_precision();
/// assert!(tight.tolerance < config.tolerance);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Residual-norm convergence tolerance.
    pub tolerance: f64,

    /// Step size below which a non-converged iteration counts as stalled.
    pub step_tolerance: f64,

    /// Maximum number of iterations.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            step_tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with the given residual tolerance.
    ///
    /// # Panics
    ///
    /// Panics if `tolerance` is not positive or `max_iterations` is zero.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        assert!(tolerance > 0.0, "tolerance must be positive");
        assert!(max_iterations > 0, "max_iterations must be > 0");
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Set the step-size tolerance.
    pub fn with_step_tolerance(mut self, step_tolerance: f64) -> Self {
        self.step_tolerance = step_tolerance;
        self
    }

    /// Tolerances near machine precision for exact-repricing calibrations.
    ///
    /// The stall threshold sits below the rounding noise of the residual so
    /// that only a genuinely stuck iteration is reported.
    pub fn high_precision() -> Self {
        Self {
            tolerance: 1e-14,
            step_tolerance: 1e-16,
            max_iterations: 500,
        }
    }

    /// Loose tolerances for quick approximate solves.
    pub fn fast() -> Self {
        Self {
            tolerance: 1e-6,
            step_tolerance: 1e-8,
            max_iterations: 50,
        }
    }
}
