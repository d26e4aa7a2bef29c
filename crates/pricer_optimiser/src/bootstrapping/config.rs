//! Multi-curve calibration configuration types.

use pricer_core::math::solvers::SolverConfig;

/// How the calibration Jacobian is computed.
///
/// # Variants
///
/// - `Analytic`: Continuous sensitivities pushed onto nodes (`J = W · S`)
/// - `FiniteDifference`: Central differences of the residual function
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JacobianMode {
    /// Analytic Jacobian from instrument curve sensitivities.
    #[default]
    Analytic,

    /// Central-difference Jacobian with the given node bump.
    FiniteDifference {
        /// Absolute bump applied to each node
        bump: f64,
    },
}

/// Configuration for [`MultiCurveFinder`](super::MultiCurveFinder).
///
/// # Examples
///
/// ```
/// use pricer_optimiser::bootstrapping::{JacobianMode, MultiCurveConfig};
///
/// let config = MultiCurveConfig::default();
/// assert_eq!(config.jacobian, JacobianMode::Analytic);
///
/// let config = MultiCurveConfig::high_precision().with_finite_difference(1e-6);
/// assert!(config.solver.tolerance < 1e-12);
/// assert_eq!(config.jacobian, JacobianMode::FiniteDifference { bump: 1e-6 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiCurveConfig {
    /// Newton solver settings.
    pub solver: SolverConfig,

    /// Jacobian computation.
    pub jacobian: JacobianMode,

    /// Starting value of every node when no initial guess is supplied.
    ///
    /// Default: 0.0
    pub initial_rate: f64,
}

impl Default for MultiCurveConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            jacobian: JacobianMode::Analytic,
            initial_rate: 0.0,
        }
    }
}

impl MultiCurveConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tolerances near machine precision, for exact repricing.
    pub fn high_precision() -> Self {
        Self {
            solver: SolverConfig::high_precision(),
            ..Self::default()
        }
    }

    /// Loose tolerances for interactive use.
    pub fn fast() -> Self {
        Self {
            solver: SolverConfig::fast(),
            ..Self::default()
        }
    }

    /// Set the Newton solver settings.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Use a central-difference Jacobian with the given bump.
    pub fn with_finite_difference(mut self, bump: f64) -> Self {
        self.jacobian = JacobianMode::FiniteDifference { bump };
        self
    }

    /// Set the starting node value.
    pub fn with_initial_rate(mut self, initial_rate: f64) -> Self {
        self.initial_rate = initial_rate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MultiCurveConfig::default();
        assert_eq!(config.solver, SolverConfig::default());
        assert_eq!(config.jacobian, JacobianMode::Analytic);
        assert_eq!(config.initial_rate, 0.0);
    }

    #[test]
    fn test_presets() {
        assert!(
            MultiCurveConfig::high_precision().solver.tolerance
                < MultiCurveConfig::default().solver.tolerance
        );
        assert!(
            MultiCurveConfig::fast().solver.tolerance > MultiCurveConfig::default().solver.tolerance
        );
    }

    #[test]
    fn test_builders() {
        let config = MultiCurveConfig::new()
            .with_solver(SolverConfig::new(1e-12, 20))
            .with_initial_rate(0.02)
            .with_finite_difference(1e-5);
        assert_eq!(config.solver.max_iterations, 20);
        assert_eq!(config.initial_rate, 0.02);
        assert_eq!(config.jacobian, JacobianMode::FiniteDifference { bump: 1e-5 });
    }
}
