//! Flat yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;

/// Flat yield curve with constant interest rate.
///
/// The single parameter is the rate itself, so every zero-rate sensitivity
/// lands on that one parameter.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05);
///
/// // Discount factor at t=1: exp(-0.05 * 1) ≈ 0.9512
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
///
/// assert_eq!(curve.zero_rate(5.0).unwrap(), 0.05);
/// assert_eq!(curve.zero_rate_sensitivities(5.0).unwrap(), vec![1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve {
    rate: f64,
}

impl FlatCurve {
    /// Construct a flat curve with the given continuously compounded rate.
    #[inline]
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Return the constant rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl YieldCurve for FlatCurve {
    #[inline]
    fn zero_rate(&self, _t: f64) -> Result<f64, MarketDataError> {
        Ok(self.rate)
    }

    #[inline]
    fn parameter_count(&self) -> usize {
        1
    }

    fn zero_rate_sensitivities(&self, _t: f64) -> Result<Vec<f64>, MarketDataError> {
        Ok(vec![1.0])
    }
}
