//! Cash deposit.

use super::error::InstrumentError;
use super::forward::SimpleForward;
use pricer_core::market_data::curves::{CurveProvider, YieldCurve};
use pricer_core::sensitivities::CurveSensitivity;

/// Deposit lending `notional` at `start` and receiving
/// `notional * (1 + rate * accrual)` at `end`, discounted on one curve.
///
/// # Examples
/// ```
/// use pricer_models::instruments::Cash;
///
/// let cash = Cash::new("USD-OIS", 0.0, 0.5, 0.05).unwrap();
/// assert_eq!(cash.accrual(), 0.5);
/// assert!(Cash::new("USD-OIS", 1.0, 0.5, 0.05).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cash {
    curve: String,
    start: f64,
    end: f64,
    accrual: f64,
    rate: f64,
    notional: f64,
}

impl Cash {
    /// Deposit with accrual `end - start` and unit notional.
    ///
    /// # Errors
    /// `InvalidParameter` if `start < 0` or `end <= start`.
    pub fn new(
        curve: impl Into<String>,
        start: f64,
        end: f64,
        rate: f64,
    ) -> Result<Self, InstrumentError> {
        if !(start >= 0.0 && end > start && end.is_finite()) {
            return Err(InstrumentError::invalid_parameter(format!(
                "cash period [{}, {}] is not a forward interval",
                start, end
            )));
        }
        Ok(Self {
            curve: curve.into(),
            start,
            end,
            accrual: end - start,
            rate,
            notional: 1.0,
        })
    }

    /// Override the accrual factor.
    ///
    /// # Errors
    /// `InvalidParameter` if `accrual <= 0`.
    pub fn with_accrual(mut self, accrual: f64) -> Result<Self, InstrumentError> {
        if !(accrual > 0.0 && accrual.is_finite()) {
            return Err(InstrumentError::invalid_parameter(format!(
                "accrual must be positive, got {}",
                accrual
            )));
        }
        self.accrual = accrual;
        Ok(self)
    }

    /// Set the notional.
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Copy with a different deposit rate.
    pub fn with_rate(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }

    /// Curve name.
    pub fn curve(&self) -> &str {
        &self.curve
    }

    /// Start time.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// End time.
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Accrual factor.
    pub fn accrual(&self) -> f64 {
        self.accrual
    }

    /// Deposit rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    fn forward(&self, curves: &dyn CurveProvider) -> Result<SimpleForward, InstrumentError> {
        let curve = curves.curve(&self.curve)?;
        Ok(SimpleForward::compute(curve, self.start, self.end, self.accrual)?)
    }

    /// Rate making the deposit worth zero.
    pub fn par_rate(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        Ok(self.forward(curves)?.rate)
    }

    /// `d(par rate)/dr(t)`.
    pub fn par_rate_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let fwd = self.forward(curves)?;
        Ok(CurveSensitivity::from_curve(self.curve.clone(), fwd.scaled_sensitivities(1.0)))
    }

    /// `N (-P(s) + (1 + Kτ) P(e))`.
    pub fn present_value(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        let curve = curves.curve(&self.curve)?;
        let p_start = curve.discount_factor(self.start)?;
        let p_end = curve.discount_factor(self.end)?;
        Ok(self.notional * (-p_start + (1.0 + self.rate * self.accrual) * p_end))
    }

    /// `dPV/dr(t)`.
    pub fn present_value_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let curve = curves.curve(&self.curve)?;
        let p_start = curve.discount_factor(self.start)?;
        let p_end = curve.discount_factor(self.end)?;
        let points = vec![
            (self.start, self.notional * self.start * p_start),
            (
                self.end,
                -self.notional * self.end * (1.0 + self.rate * self.accrual) * p_end,
            ),
        ];
        Ok(CurveSensitivity::from_curve(self.curve.clone(), points))
    }
}
