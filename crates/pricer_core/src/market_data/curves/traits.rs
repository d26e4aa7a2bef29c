//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;

/// Yield curve described by continuously compounded zero rates.
///
/// Besides discount factors, a curve exposes its parameter vector's
/// influence on the zero rate at any time. Continuous-time sensitivities
/// are expressed against the zero rate `r(t)`, so
/// [`zero_rate_sensitivities`](YieldCurve::zero_rate_sensitivities) is the
/// row that maps a sensitivity at `t` onto the curve parameters.
///
/// # Required Methods
///
/// - [`zero_rate`](YieldCurve::zero_rate)
/// - [`parameter_count`](YieldCurve::parameter_count)
/// - [`zero_rate_sensitivities`](YieldCurve::zero_rate_sensitivities)
pub trait YieldCurve {
    /// Continuously compounded zero rate `r(t)`.
    fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError>;

    /// Number of parameters (nodes) defining the curve.
    fn parameter_count(&self) -> usize;

    /// `dr(t)/dp_j` for every parameter `p_j`, in parameter order.
    fn zero_rate_sensitivities(&self, t: f64) -> Result<Vec<f64>, MarketDataError>;

    /// Discount factor `exp(-r(t) t)`.
    ///
    /// # Errors
    ///
    /// `InvalidMaturity` for negative `t`.
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok((-self.zero_rate(t)? * t).exp())
    }

    /// Continuously compounded forward rate between `t1` and `t2`.
    fn forward_rate(&self, t1: f64, t2: f64) -> Result<f64, MarketDataError> {
        let dt = t2 - t1;
        if dt <= 0.0 {
            return Err(MarketDataError::InvalidMaturity { t: dt });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockCurve {
        rate: f64,
    }

    impl YieldCurve for MockCurve {
        fn zero_rate(&self, _t: f64) -> Result<f64, MarketDataError> {
            Ok(self.rate)
        }

        fn parameter_count(&self) -> usize {
            1
        }

        fn zero_rate_sensitivities(&self, _t: f64) -> Result<Vec<f64>, MarketDataError> {
            Ok(vec![1.0])
        }
    }

    #[test]
    fn test_default_discount_factor() {
        let curve = MockCurve { rate: 0.05 };
        let df = curve.discount_factor(2.0).unwrap();
        assert!((df - (-0.1f64).exp()).abs() < 1e-15);
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_negative_maturity_rejected() {
        let curve = MockCurve { rate: 0.05 };
        assert!(matches!(
            curve.discount_factor(-1.0),
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_default_forward_rate() {
        let curve = MockCurve { rate: 0.03 };
        let fwd = curve.forward_rate(1.0, 2.0).unwrap();
        assert!((fwd - 0.03).abs() < 1e-14);
        assert!(curve.forward_rate(2.0, 1.0).is_err());
    }
}
