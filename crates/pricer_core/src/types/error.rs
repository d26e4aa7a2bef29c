//! Error types for structured error handling.
//!
//! This module provides:
//! - `ErrorCategory`: The three failure classes every error maps onto
//! - `CurrencyError`: Currency parsing and FX rate lookups
//! - `InterpolationError`: Errors from interpolation operations
//! - `SolverError`: Errors from root-finding and least-squares solvers
//!
//! Higher layers define their own error enums and convert these with
//! `#[from]`. Every error in the workspace reports an [`ErrorCategory`] so
//! callers can tell a bad argument from a bad setup from a failed fit
//! without matching on individual variants.

use super::currency::Currency;
use thiserror::Error;

/// Failure class of an error.
///
/// # Variants
/// - `InvalidArgument`: Mismatched lengths, negative tolerances, unknown names
/// - `InvalidConfiguration`: Inconsistent setup detected before any solve
/// - `CalibrationFailure`: An iterative fit did not converge
///
/// # Examples
/// ```
/// use pricer_core::types::{ErrorCategory, SolverError};
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 50, residual: 1e-3 };
/// assert_eq!(err.category(), ErrorCategory::CalibrationFailure);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    /// Caller passed an argument the operation cannot accept.
    InvalidArgument,
    /// Setup is inconsistent (counts, duplicate names).
    InvalidConfiguration,
    /// Iterative solve or fit failed to converge.
    CalibrationFailure,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::InvalidArgument => write!(f, "invalid argument"),
            ErrorCategory::InvalidConfiguration => write!(f, "invalid configuration"),
            ErrorCategory::CalibrationFailure => write!(f, "calibration failure"),
        }
    }
}

/// Currency and FX rate errors.
///
/// # Examples
/// ```
/// use pricer_core::types::{Currency, CurrencyError};
///
/// let err = CurrencyError::MissingRate { from: Currency::EUR, to: Currency::JPY };
/// assert_eq!(format!("{}", err), "No FX rate from EUR to JPY");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurrencyError {
    /// Code not among the supported currencies.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Rate not positive and finite.
    #[error("Invalid FX rate {rate} for {currency}")]
    InvalidRate {
        /// Currency being added
        currency: Currency,
        /// Offending rate
        rate: f64,
    },

    /// Currency added to a matrix twice.
    #[error("Currency {0} already in the FX matrix")]
    DuplicateCurrency(Currency),

    /// No path between the two currencies.
    #[error("No FX rate from {from} to {to}")]
    MissingRate {
        /// Source currency
        from: Currency,
        /// Target currency
        to: Currency,
    },
}

impl CurrencyError {
    /// Failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CurrencyError::DuplicateCurrency(_) => ErrorCategory::InvalidConfiguration,
            _ => ErrorCategory::InvalidArgument,
        }
    }
}

/// Interpolation-related errors.
///
/// # Variants
/// - `OutOfBounds`: Query point outside valid interpolation domain
/// - `InsufficientData`: Not enough data points for interpolation
/// - `NonMonotonicData`: Abscissae not strictly increasing
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use pricer_core::types::InterpolationError;
///
/// let err = InterpolationError::OutOfBounds { x: 5.0, min: 0.0, max: 3.0 };
/// assert!(format!("{}", err).contains("outside valid domain"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Query point outside valid interpolation domain.
    #[error("Query point {x} outside valid domain [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Abscissae are not strictly increasing.
    #[error("Data is not strictly increasing at index {index}")]
    NonMonotonicData {
        /// Index where monotonicity violation was detected
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl InterpolationError {
    /// All interpolation failures are caused by the data handed in.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidArgument
    }
}

/// Root-finding and least-squares solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `SingularMatrix`: A linear system in the iteration could not be solved
/// - `DimensionMismatch`: Function output length disagrees with the problem size
/// - `NumericalInstability`: Non-finite values appeared during iteration
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100, residual: 0.5 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations (residual norm {residual:e})")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
        /// Residual norm at the last iterate
        residual: f64,
    },

    /// Linear system could not be solved (singular or ill-conditioned).
    #[error("Singular matrix in {context}")]
    SingularMatrix {
        /// Where the singular system was encountered
        context: String,
    },

    /// Vector or matrix size disagrees with the problem dimension.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl SolverError {
    /// Failure class of this error.
    ///
    /// Dimension mismatches are programming errors of the caller; everything
    /// else means the iteration itself did not produce a solution.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SolverError::DimensionMismatch { .. } => ErrorCategory::InvalidArgument,
            _ => ErrorCategory::CalibrationFailure,
        }
    }

    /// Returns `true` if the solver ran out of iterations.
    pub fn is_not_converged(&self) -> bool {
        matches!(self, SolverError::MaxIterationsExceeded { .. })
    }
}
