//! Market data error types.
//!
//! This module provides structured error handling for market data operations
//! including yield curve lookups and parameter surfaces.

use crate::types::{CurrencyError, ErrorCategory, InterpolationError};
use thiserror::Error;

/// Market data errors.
///
/// # Variants
/// - `InvalidMaturity`: Negative or otherwise unusable time
/// - `CurveNotFound`: Named curve absent from the curve set
/// - `DuplicateCurve`: Same curve name supplied twice
/// - `ParameterCount`: Wrong number of parameters for a curve or surface
/// - `Interpolation`: Underlying interpolation failure
/// - `InsufficientData`: Not enough points to build a curve or surface
/// - `Currency`: Missing or invalid FX rate
///
/// # Examples
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::CurveNotFound { name: "USD-LIBOR-3M".to_string() };
/// assert_eq!(format!("{}", err), "Curve not found: USD-LIBOR-3M");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid time to maturity.
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity
        t: f64,
    },

    /// Curve name not present.
    #[error("Curve not found: {name}")]
    CurveNotFound {
        /// Requested curve name
        name: String,
    },

    /// Curve name supplied more than once.
    #[error("Duplicate curve name: {name}")]
    DuplicateCurve {
        /// Offending curve name
        name: String,
    },

    /// Parameter vector length does not match the curve or surface.
    #[error("Parameter count mismatch: expected {expected}, got {got}")]
    ParameterCount {
        /// Number of parameters the object has
        expected: usize,
        /// Number supplied
        got: usize,
    },

    /// Interpolation failure.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// Not enough data points.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Points supplied
        got: usize,
        /// Points required
        need: usize,
    },

    /// FX rate lookup failure.
    #[error("Currency error: {0}")]
    Currency(#[from] CurrencyError),
}

impl MarketDataError {
    /// Failure class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MarketDataError::DuplicateCurve { .. } => ErrorCategory::InvalidConfiguration,
            MarketDataError::Currency(e) => e.category(),
            _ => ErrorCategory::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_maturity_display() {
        let err = MarketDataError::InvalidMaturity { t: -1.5 };
        assert_eq!(format!("{}", err), "Invalid maturity: t = -1.5");
    }

    #[test]
    fn test_parameter_count_display() {
        let err = MarketDataError::ParameterCount {
            expected: 4,
            got: 3,
        };
        assert_eq!(
            format!("{}", err),
            "Parameter count mismatch: expected 4, got 3"
        );
    }

    #[test]
    fn test_from_interpolation_error() {
        let err: MarketDataError = InterpolationError::InsufficientData { got: 1, need: 2 }.into();
        assert!(matches!(err, MarketDataError::Interpolation(_)));
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }

    #[test]
    fn test_duplicate_curve_is_configuration_error() {
        let err = MarketDataError::DuplicateCurve {
            name: "DSC".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::InvalidConfiguration);
    }

    #[test]
    fn test_currency_error_keeps_category() {
        use crate::types::Currency;

        let missing: MarketDataError = CurrencyError::MissingRate {
            from: Currency::EUR,
            to: Currency::USD,
        }
        .into();
        assert_eq!(missing.category(), ErrorCategory::InvalidArgument);
        assert_eq!(
            format!("{}", missing),
            "Currency error: No FX rate from EUR to USD"
        );

        let duplicate: MarketDataError = CurrencyError::DuplicateCurrency(Currency::GBP).into();
        assert_eq!(duplicate.category(), ErrorCategory::InvalidConfiguration);
    }
}
