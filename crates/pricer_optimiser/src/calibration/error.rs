//! SABR surface calibration errors.

use pricer_core::market_data::surfaces::GridPoint;
use pricer_core::market_data::MarketDataError;
use pricer_core::types::ErrorCategory;
use pricer_models::calibration::CalibrationError;
use pricer_models::models::SabrError;
use thiserror::Error;

/// Errors raised while calibrating a SABR surface.
///
/// A failed smile fit is always reported with its grid point; no surface
/// is built from a partially fitted grid.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::surfaces::GridPoint;
/// use pricer_core::types::ErrorCategory;
/// use pricer_models::calibration::CalibrationError;
/// use pricer_optimiser::calibration::SurfaceCalibrationError;
///
/// let err = SurfaceCalibrationError::PointFailure {
///     point: GridPoint::new(1.0, 5.0),
///     source: CalibrationError::convergence_failure(100, 0.3),
/// };
/// assert!(err.to_string().contains("(1, 5)"));
/// assert_eq!(err.category(), ErrorCategory::CalibrationFailure);
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceCalibrationError {
    /// Smile fit at one grid point failed.
    #[error("SABR fit failed at (expiry, tenor) = {point}: {source}")]
    PointFailure {
        /// Grid point of the failing smile
        point: GridPoint,
        /// Underlying fit error
        source: CalibrationError,
    },

    /// Same grid point supplied twice.
    #[error("Duplicate grid point {point}")]
    DuplicatePoint {
        /// The repeated point
        point: GridPoint,
    },

    /// Point is not a node of the surface.
    #[error("Grid point {point} is not a surface node")]
    UnknownPoint {
        /// The requested point
        point: GridPoint,
    },

    /// Points do not cover every (expiry, tenor) combination.
    #[error("Incomplete grid: {points} points for {expiries} expiries x {tenors} tenors")]
    IncompleteGrid {
        /// Distinct expiries
        expiries: usize,
        /// Distinct tenors
        tenors: usize,
        /// Points supplied
        points: usize,
    },

    /// Surface construction failure.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Interpolated parameters outside the SABR domain.
    #[error("Model error: {0}")]
    Model(#[from] SabrError),
}

impl SurfaceCalibrationError {
    /// Error category for reporting.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PointFailure { source, .. } => source.category(),
            Self::DuplicatePoint { .. }
            | Self::UnknownPoint { .. }
            | Self::IncompleteGrid { .. } => ErrorCategory::InvalidArgument,
            Self::MarketData(e) => e.category(),
            Self::Model(e) => e.category(),
        }
    }

    /// Grid point of a failed fit, if that is what this is.
    pub fn failed_point(&self) -> Option<GridPoint> {
        match self {
            Self::PointFailure { point, .. } => Some(*point),
            _ => None,
        }
    }
}
