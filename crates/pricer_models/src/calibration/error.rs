//! Calibration error types.
//!
//! Errors raised while fitting model parameters to market quotes. A fit
//! that does not converge is always an error: callers never receive a
//! partially fitted parameter set.

use crate::models::SabrError;
use pricer_core::types::{ErrorCategory, SolverError};
use thiserror::Error;

/// Calibration error type.
///
/// # Variants
/// - `ConvergenceFailure`: Optimiser stopped without meeting a convergence test
/// - `InsufficientData`: Fewer quotes than the fit requires
/// - `InvalidMarketData`: Quotes failed validation
/// - `InvalidConfig`: Fit settings leave nothing to solve
/// - `Solver`: Failure inside the numerical solver
/// - `Model`: Model parameters outside their domain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Convergence failure - optimiser did not converge
    ///
    /// Contains iteration count and final residual for diagnostics.
    #[error("Calibration did not converge (iterations: {iterations}, residual: {residual:.6e})")]
    ConvergenceFailure {
        /// Number of iterations performed
        iterations: usize,
        /// Final residual (sum of squared errors)
        residual: f64,
    },

    /// Insufficient market data
    #[error("Insufficient market data (required: {required}, provided: {provided})")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual data points provided
        provided: usize,
    },

    /// Invalid market data
    ///
    /// Market data failed validation (e.g., non-positive forward or strikes).
    #[error("Invalid market data: {message}")]
    InvalidMarketData {
        /// Description of the validation failure
        message: String,
    },

    /// Invalid fit configuration.
    #[error("Invalid calibration configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem
        message: String,
    },

    /// Numerical solver failure.
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    /// SABR parameter error.
    #[error("Model error: {0}")]
    Model(#[from] SabrError),
}

impl CalibrationError {
    /// Create a convergence failure error.
    pub fn convergence_failure(iterations: usize, residual: f64) -> Self {
        CalibrationError::ConvergenceFailure {
            iterations,
            residual,
        }
    }

    /// Create an insufficient data error.
    pub fn insufficient_data(required: usize, provided: usize) -> Self {
        CalibrationError::InsufficientData { required, provided }
    }

    /// Create an invalid market data error.
    pub fn invalid_market_data(message: impl Into<String>) -> Self {
        CalibrationError::InvalidMarketData {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        CalibrationError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Error category for reporting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalibrationError::ConvergenceFailure { .. } => ErrorCategory::CalibrationFailure,
            CalibrationError::InsufficientData { .. }
            | CalibrationError::InvalidMarketData { .. } => ErrorCategory::InvalidArgument,
            CalibrationError::InvalidConfig { .. } => ErrorCategory::InvalidConfiguration,
            CalibrationError::Solver(e) => e.category(),
            CalibrationError::Model(e) => e.category(),
        }
    }

    /// Check if this is a recoverable error.
    ///
    /// Recoverable errors might succeed with a different initial guess or
    /// optimiser settings.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CalibrationError::ConvergenceFailure { .. } => true,
            CalibrationError::Solver(e) => e.is_not_converged(),
            _ => false,
        }
    }
}
