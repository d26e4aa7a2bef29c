//! Interpolated yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{
    CubicSplineInterpolator, Extrapolation, Interpolator, LinearInterpolator,
};

/// Interpolation method for yield curve construction.
///
/// # Variants
///
/// - `Linear`: Linear interpolation on zero rates
/// - `NaturalCubicSpline`: Natural cubic spline on zero rates (3+ nodes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveInterpolation {
    /// Linear interpolation on zero rates.
    #[default]
    Linear,
    /// Natural cubic spline on zero rates.
    NaturalCubicSpline,
}

#[derive(Debug, Clone)]
enum RateInterpolator {
    Linear(LinearInterpolator<f64>),
    Spline(CubicSplineInterpolator<f64>),
}

impl RateInterpolator {
    fn build(
        times: &[f64],
        rates: &[f64],
        method: CurveInterpolation,
        extrapolation: Extrapolation,
    ) -> Result<Self, MarketDataError> {
        Ok(match method {
            CurveInterpolation::Linear => RateInterpolator::Linear(
                LinearInterpolator::new(times, rates)?.with_extrapolation(extrapolation),
            ),
            CurveInterpolation::NaturalCubicSpline => RateInterpolator::Spline(
                CubicSplineInterpolator::new(times, rates)?.with_extrapolation(extrapolation),
            ),
        })
    }

    fn as_dyn(&self) -> &dyn Interpolator<f64> {
        match self {
            RateInterpolator::Linear(i) => i,
            RateInterpolator::Spline(i) => i,
        }
    }
}

/// Yield curve interpolated on continuously compounded zero rates.
///
/// Each node `(t_i, r_i)` is one curve parameter. The node rates are the
/// values a calibration solves for, and the interpolator's node weights are
/// the curve's zero-rate sensitivities.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveInterpolation, InterpolatedCurve, YieldCurve};
///
/// let curve = InterpolatedCurve::new(
///     &[1.0, 2.0, 5.0],
///     &[0.02, 0.025, 0.03],
///     CurveInterpolation::Linear,
///     true,
/// )
/// .unwrap();
///
/// assert!((curve.zero_rate(1.5).unwrap() - 0.0225).abs() < 1e-12);
/// assert_eq!(curve.zero_rate_sensitivities(1.5).unwrap(), vec![0.5, 0.5, 0.0]);
/// // Flat extrapolation below the first node
/// assert_eq!(curve.zero_rate(0.25).unwrap(), 0.02);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedCurve {
    times: Vec<f64>,
    rates: Vec<f64>,
    method: CurveInterpolation,
    allow_extrapolation: bool,
    interpolator: RateInterpolator,
}

impl InterpolatedCurve {
    /// Construct an interpolated curve from node times and zero rates.
    ///
    /// # Arguments
    ///
    /// * `times` - Strictly increasing, non-negative node times
    /// * `rates` - Zero rates at the nodes
    /// * `method` - Interpolation method
    /// * `allow_extrapolation` - Flat extrapolation outside the node range
    ///
    /// # Errors
    ///
    /// * `InvalidMaturity` - A negative node time
    /// * `Interpolation` - Too few nodes, unsorted times, or length mismatch
    pub fn new(
        times: &[f64],
        rates: &[f64],
        method: CurveInterpolation,
        allow_extrapolation: bool,
    ) -> Result<Self, MarketDataError> {
        if let Some(&t) = times.iter().find(|&&t| t < 0.0) {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        let extrapolation = if allow_extrapolation {
            Extrapolation::Flat
        } else {
            Extrapolation::None
        };
        let interpolator = RateInterpolator::build(times, rates, method, extrapolation)?;
        Ok(Self {
            times: times.to_vec(),
            rates: rates.to_vec(),
            method,
            allow_extrapolation,
            interpolator,
        })
    }

    /// Same nodes and method with new zero rates.
    pub fn with_rates(&self, rates: &[f64]) -> Result<Self, MarketDataError> {
        if rates.len() != self.times.len() {
            return Err(MarketDataError::ParameterCount {
                expected: self.times.len(),
                got: rates.len(),
            });
        }
        Self::new(&self.times, rates, self.method, self.allow_extrapolation)
    }

    /// Node times.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Node zero rates.
    #[inline]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Interpolation method.
    #[inline]
    pub fn method(&self) -> CurveInterpolation {
        self.method
    }

    /// Whether flat extrapolation is enabled.
    #[inline]
    pub fn allow_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }
}

impl YieldCurve for InterpolatedCurve {
    fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        Ok(self.interpolator.as_dyn().interpolate(t)?)
    }

    #[inline]
    fn parameter_count(&self) -> usize {
        self.times.len()
    }

    fn zero_rate_sensitivities(&self, t: f64) -> Result<Vec<f64>, MarketDataError> {
        Ok(self.interpolator.as_dyn().node_weights(t)?)
    }
}
