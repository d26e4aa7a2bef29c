//! Risk error types.

use pricer_core::market_data::surfaces::GridPoint;
use pricer_core::market_data::MarketDataError;
use pricer_core::types::ErrorCategory;
use pricer_models::instruments::InstrumentError;
use pricer_optimiser::bootstrapping::BootstrapError;
use thiserror::Error;

/// Errors raised while turning sensitivities into node risk.
///
/// # Examples
/// ```
/// use pricer_core::types::ErrorCategory;
/// use pricer_risk::RiskError;
///
/// let err = RiskError::wrong_names(vec!["EUR-ESTR".to_string()]);
/// assert!(err.to_string().starts_with("wrong names"));
/// assert_eq!(err.category(), ErrorCategory::InvalidArgument);
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RiskError {
    /// Sensitivity or node layout names curves the bundle does not hold.
    #[error("wrong names: curves {names:?} are not in the curve bundle")]
    WrongNames {
        /// Offending curve names
        names: Vec<String>,
    },

    /// Inverse calibration Jacobian does not match the node layout.
    #[error("inverse jacobian is {rows}x{cols}, node layout has {nodes} nodes")]
    JacobianShape {
        /// Rows supplied
        rows: usize,
        /// Columns supplied
        cols: usize,
        /// Total calibration nodes
        nodes: usize,
    },

    /// SABR inverse Jacobian without one row per parameter.
    #[error("inverse jacobian at {point} has {rows} rows, expected 4")]
    SabrJacobianShape {
        /// Grid node
        point: GridPoint,
        /// Rows supplied
        rows: usize,
    },

    /// Node projection failure.
    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// Sensitivity calculator failure.
    #[error("Instrument error: {0}")]
    Instrument(#[from] InstrumentError),

    /// Curve or surface access failure.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),
}

impl RiskError {
    /// Create a wrong-names error.
    pub fn wrong_names(names: Vec<String>) -> Self {
        RiskError::WrongNames { names }
    }

    /// Error category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RiskError::WrongNames { .. } | RiskError::SabrJacobianShape { .. } => {
                ErrorCategory::InvalidArgument
            }
            RiskError::JacobianShape { .. } => ErrorCategory::InvalidConfiguration,
            RiskError::Bootstrap(e) => e.category(),
            RiskError::Instrument(e) => e.category(),
            RiskError::MarketData(e) => e.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_names_display() {
        let err = RiskError::wrong_names(vec!["A".to_string(), "B".to_string()]);
        assert_eq!(
            format!("{}", err),
            "wrong names: curves [\"A\", \"B\"] are not in the curve bundle"
        );
    }

    #[test]
    fn test_categories() {
        let shape = RiskError::JacobianShape {
            rows: 3,
            cols: 3,
            nodes: 4,
        };
        assert_eq!(shape.category(), ErrorCategory::InvalidConfiguration);

        let sabr = RiskError::SabrJacobianShape {
            point: GridPoint::new(1.0, 5.0),
            rows: 3,
        };
        assert_eq!(sabr.category(), ErrorCategory::InvalidArgument);
        assert!(sabr.to_string().contains("(1, 5)"));

        let wrapped: RiskError = BootstrapError::convergence_failure(1e-3, 100).into();
        assert_eq!(wrapped.category(), ErrorCategory::CalibrationFailure);
    }
}
