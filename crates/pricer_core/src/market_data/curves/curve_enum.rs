//! Static dispatch over the concrete yield curve types.

use super::{FlatCurve, InterpolatedCurve, YieldCurve};
use crate::market_data::error::MarketDataError;

/// Static dispatch enum wrapping concrete yield curve implementations.
///
/// # Variants
///
/// - `Flat`: Constant rate yield curve
/// - `Interpolated`: Node-based interpolated yield curve
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
///
/// let curve = CurveEnum::flat(0.05);
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub enum CurveEnum {
    /// Flat (constant rate) yield curve
    Flat(FlatCurve),
    /// Interpolated yield curve with nodes
    Interpolated(InterpolatedCurve),
}

impl CurveEnum {
    /// Flat curve at `rate`.
    #[inline]
    pub fn flat(rate: f64) -> Self {
        CurveEnum::Flat(FlatCurve::new(rate))
    }

    /// Same curve shape with a new parameter vector.
    ///
    /// # Errors
    ///
    /// `ParameterCount` if `params` does not have
    /// [`parameter_count`](YieldCurve::parameter_count) entries.
    pub fn with_parameters(&self, params: &[f64]) -> Result<Self, MarketDataError> {
        match self {
            CurveEnum::Flat(_) => match params {
                [rate] => Ok(CurveEnum::flat(*rate)),
                _ => Err(MarketDataError::ParameterCount {
                    expected: 1,
                    got: params.len(),
                }),
            },
            CurveEnum::Interpolated(curve) => {
                Ok(CurveEnum::Interpolated(curve.with_rates(params)?))
            }
        }
    }

    /// Current parameter vector.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            CurveEnum::Flat(curve) => vec![curve.rate()],
            CurveEnum::Interpolated(curve) => curve.rates().to_vec(),
        }
    }
}

impl YieldCurve for CurveEnum {
    #[inline]
    fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => curve.zero_rate(t),
            CurveEnum::Interpolated(curve) => curve.zero_rate(t),
        }
    }

    #[inline]
    fn parameter_count(&self) -> usize {
        match self {
            CurveEnum::Flat(curve) => curve.parameter_count(),
            CurveEnum::Interpolated(curve) => curve.parameter_count(),
        }
    }

    fn zero_rate_sensitivities(&self, t: f64) -> Result<Vec<f64>, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => curve.zero_rate_sensitivities(t),
            CurveEnum::Interpolated(curve) => curve.zero_rate_sensitivities(t),
        }
    }
}

impl From<FlatCurve> for CurveEnum {
    fn from(curve: FlatCurve) -> Self {
        CurveEnum::Flat(curve)
    }
}

impl From<InterpolatedCurve> for CurveEnum {
    fn from(curve: InterpolatedCurve) -> Self {
        CurveEnum::Interpolated(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::curves::CurveInterpolation;

    #[test]
    fn test_with_parameters_flat() {
        let curve = CurveEnum::flat(0.01).with_parameters(&[0.03]).unwrap();
        assert_eq!(curve.zero_rate(2.0).unwrap(), 0.03);
        assert!(CurveEnum::flat(0.01).with_parameters(&[0.01, 0.02]).is_err());
    }

    #[test]
    fn test_with_parameters_interpolated() {
        let base: CurveEnum = InterpolatedCurve::new(
            &[1.0, 2.0],
            &[0.01, 0.02],
            CurveInterpolation::Linear,
            true,
        )
        .unwrap()
        .into();
        let curve = base.with_parameters(&[0.03, 0.04]).unwrap();
        assert_eq!(curve.parameters(), vec![0.03, 0.04]);
        assert_eq!(curve.parameter_count(), 2);
    }
}
