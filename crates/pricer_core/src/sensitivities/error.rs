//! Sensitivity algebra errors.

use crate::types::ErrorCategory;
use thiserror::Error;

/// Errors raised by sensitivity containers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SensitivityError {
    /// Cleaning tolerances must be finite and non-negative.
    #[error("Invalid clean tolerance: relative = {relative}, absolute = {absolute}")]
    InvalidTolerance {
        /// Relative tolerance supplied
        relative: f64,
        /// Absolute tolerance supplied
        absolute: f64,
    },
}

impl SensitivityError {
    /// Error category for reporting.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidArgument
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_category() {
        let err = SensitivityError::InvalidTolerance {
            relative: -1.0,
            absolute: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid clean tolerance: relative = -1, absolute = 0"
        );
        assert_eq!(err.category(), ErrorCategory::InvalidArgument);
    }
}
