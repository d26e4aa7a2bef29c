//! Instrument error types.

use pricer_core::market_data::MarketDataError;
use pricer_core::types::ErrorCategory;
use thiserror::Error;

/// Instrument construction and valuation errors.
///
/// # Variants
/// - `InvalidParameter`: Field validation failure
/// - `InvalidSchedule`: Payment schedule inconsistent or empty
/// - `ZeroAnnuity`: Fixed leg annuity vanishes so no par rate exists
/// - `MarketData`: Curve lookup or evaluation failure
///
/// # Examples
/// ```
/// use pricer_models::instruments::InstrumentError;
///
/// let err = InstrumentError::InvalidParameter { message: "end before start".to_string() };
/// assert!(format!("{}", err).contains("end before start"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Invalid instrument field.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the parameter error
        message: String,
    },

    /// Invalid payment schedule.
    #[error("Invalid schedule: {message}")]
    InvalidSchedule {
        /// Description of the schedule error
        message: String,
    },

    /// Fixed leg annuity is zero.
    #[error("Fixed leg annuity is zero")]
    ZeroAnnuity,

    /// Curve access failure.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

impl InstrumentError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        InstrumentError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an invalid schedule error.
    pub fn invalid_schedule(message: impl Into<String>) -> Self {
        InstrumentError::InvalidSchedule {
            message: message.into(),
        }
    }

    /// Error category for reporting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            InstrumentError::MarketData(e) => e.category(),
            _ => ErrorCategory::InvalidArgument,
        }
    }
}
