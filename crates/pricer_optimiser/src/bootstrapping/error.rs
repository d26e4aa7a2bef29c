//! Multi-curve calibration error types.
//!
//! Structural problems (node counts, curve names) are detected when a
//! [`MultiCurveProblem`](super::MultiCurveProblem) is built, before any
//! solve begins. Solver failures are reported once the Newton iteration
//! gives up.

use pricer_core::market_data::MarketDataError;
use pricer_core::types::{ErrorCategory, SolverError};
use pricer_models::instruments::InstrumentError;
use thiserror::Error;

/// Errors that can occur while calibrating a curve bundle.
///
/// # Variants
///
/// - `ConvergenceFailure`: Newton iteration did not reprice the instruments
/// - `NodeCountMismatch`: Instrument count differs from total node count
/// - `TargetCountMismatch`: One target per instrument was not supplied
/// - `DuplicateCurve`: A curve is both known and solved, or declared twice
/// - `UnknownCurve`: An instrument references a curve outside the bundle
/// - `InvalidNodes`: Empty or unsorted node times
/// - `Solver`: Wrapped solver error
/// - `MarketData`: Wrapped market data error
/// - `Instrument`: Wrapped instrument valuation error
///
/// # Examples
///
/// ```
/// use pricer_core::types::ErrorCategory;
/// use pricer_optimiser::bootstrapping::BootstrapError;
///
/// let err = BootstrapError::node_count_mismatch(9, 10);
/// assert!(format!("{}", err).contains("wrong number of nodes"));
/// assert_eq!(err.category(), ErrorCategory::InvalidConfiguration);
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BootstrapError {
    /// Solver failed to reprice the calibration instruments.
    #[error("Failed to converge: residual = {residual} after {iterations} iterations")]
    ConvergenceFailure {
        /// Final residual norm
        residual: f64,
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Instrument count differs from node count.
    #[error("wrong number of nodes: {instruments} instruments for {nodes} nodes")]
    NodeCountMismatch {
        /// Number of calibration instruments
        instruments: usize,
        /// Total number of calibration nodes
        nodes: usize,
    },

    /// Target count differs from instrument count.
    #[error("{targets} targets supplied for {instruments} instruments")]
    TargetCountMismatch {
        /// Number of calibration instruments
        instruments: usize,
        /// Number of targets
        targets: usize,
    },

    /// Curve name used twice across the known and solved sets.
    #[error("Duplicate curve: {name}")]
    DuplicateCurve {
        /// The duplicated curve name
        name: String,
    },

    /// Instrument references a curve that is neither known nor solved.
    #[error("Instrument {index} references unknown curve {name}")]
    UnknownCurve {
        /// Index of the instrument
        index: usize,
        /// The missing curve name
        name: String,
    },

    /// Node times unusable.
    #[error("Invalid nodes for curve {curve}: {message}")]
    InvalidNodes {
        /// Curve name
        curve: String,
        /// Description of the problem
        message: String,
    },

    /// Wrapped solver error from root-finding operations.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// Wrapped market data error.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Wrapped instrument error.
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),
}

impl BootstrapError {
    /// Create a convergence failure error.
    pub fn convergence_failure(residual: f64, iterations: usize) -> Self {
        Self::ConvergenceFailure {
            residual,
            iterations,
        }
    }

    /// Create a node count mismatch error.
    pub fn node_count_mismatch(instruments: usize, nodes: usize) -> Self {
        Self::NodeCountMismatch { instruments, nodes }
    }

    /// Create a duplicate curve error.
    pub fn duplicate_curve(name: impl Into<String>) -> Self {
        Self::DuplicateCurve { name: name.into() }
    }

    /// Create an invalid nodes error.
    pub fn invalid_nodes(curve: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidNodes {
            curve: curve.into(),
            message: message.into(),
        }
    }

    /// Error category for reporting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConvergenceFailure { .. } => ErrorCategory::CalibrationFailure,
            Self::NodeCountMismatch { .. }
            | Self::DuplicateCurve { .. }
            | Self::UnknownCurve { .. } => ErrorCategory::InvalidConfiguration,
            Self::TargetCountMismatch { .. } | Self::InvalidNodes { .. } => {
                ErrorCategory::InvalidArgument
            }
            Self::Solver(e) => e.category(),
            Self::MarketData(e) => e.category(),
            Self::Instrument(e) => e.category(),
        }
    }

    /// Check if this is a convergence failure.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, Self::ConvergenceFailure { .. })
    }

    /// Check if this is a setup error detected before solving.
    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::InvalidConfiguration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // Display
    // ========================================

    #[test]
    fn test_convergence_failure_display() {
        let err = BootstrapError::convergence_failure(0.001, 100);
        let display = format!("{}", err);
        assert!(display.contains("0.001"));
        assert!(display.contains("100"));
        assert!(err.is_convergence_failure());
    }

    #[test]
    fn test_unknown_curve_display() {
        let err = BootstrapError::UnknownCurve {
            index: 3,
            name: "EUR-6M".to_string(),
        };
        assert!(err.to_string().contains("EUR-6M"));
        assert!(err.is_configuration_error());
    }

    // ========================================
    // Categories
    // ========================================

    #[test]
    fn test_categories() {
        assert_eq!(
            BootstrapError::duplicate_curve("USD-OIS").category(),
            ErrorCategory::InvalidConfiguration
        );
        assert_eq!(
            BootstrapError::invalid_nodes("USD-OIS", "empty").category(),
            ErrorCategory::InvalidArgument
        );
        assert_eq!(
            BootstrapError::from(SolverError::MaxIterationsExceeded {
                iterations: 10,
                residual: 1.0
            })
            .category(),
            ErrorCategory::CalibrationFailure
        );
    }

    #[test]
    fn test_wrapped_conversions() {
        let err: BootstrapError = MarketDataError::CurveNotFound {
            name: "X".to_string(),
        }
        .into();
        assert!(matches!(err, BootstrapError::MarketData(_)));

        let err: BootstrapError = InstrumentError::ZeroAnnuity.into();
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }
}
