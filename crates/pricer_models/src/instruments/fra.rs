//! Forward rate agreement.

use super::error::InstrumentError;
use super::forward::SimpleForward;
use pricer_core::market_data::curves::{CurveProvider, YieldCurve};
use pricer_core::sensitivities::CurveSensitivity;

/// FRA paying `notional * τ * (F - K)` at the end of the fixing period,
/// where `F` is projected on the forward curve and discounted on the
/// discount curve.
///
/// # Examples
/// ```
/// use pricer_models::instruments::Fra;
///
/// let fra = Fra::new("USD-OIS", "USD-LIBOR-3M", 0.5, 0.75, 0.03).unwrap();
/// assert_eq!(fra.payment_time(), 0.75);
/// assert_eq!(fra.accrual(), 0.25);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fra {
    discount_curve: String,
    forward_curve: String,
    fixing_start: f64,
    fixing_end: f64,
    fixing_accrual: f64,
    payment_time: f64,
    accrual: f64,
    rate: f64,
    notional: f64,
}

impl Fra {
    /// FRA on `[fixing_start, fixing_end]` paid at `fixing_end`.
    ///
    /// # Errors
    /// `InvalidParameter` if the fixing period is not a forward interval.
    pub fn new(
        discount_curve: impl Into<String>,
        forward_curve: impl Into<String>,
        fixing_start: f64,
        fixing_end: f64,
        rate: f64,
    ) -> Result<Self, InstrumentError> {
        if !(fixing_start >= 0.0 && fixing_end > fixing_start && fixing_end.is_finite()) {
            return Err(InstrumentError::invalid_parameter(format!(
                "fixing period [{}, {}] is not a forward interval",
                fixing_start, fixing_end
            )));
        }
        Ok(Self {
            discount_curve: discount_curve.into(),
            forward_curve: forward_curve.into(),
            fixing_start,
            fixing_end,
            fixing_accrual: fixing_end - fixing_start,
            payment_time: fixing_end,
            accrual: fixing_end - fixing_start,
            rate,
            notional: 1.0,
        })
    }

    /// Set the notional.
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Copy with a different fixed rate.
    pub fn with_rate(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }

    /// Discount curve name.
    pub fn discount_curve(&self) -> &str {
        &self.discount_curve
    }

    /// Forward curve name.
    pub fn forward_curve(&self) -> &str {
        &self.forward_curve
    }

    /// Payment time.
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Payment accrual factor.
    pub fn accrual(&self) -> f64 {
        self.accrual
    }

    /// Fixed rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    fn forward(&self, curves: &dyn CurveProvider) -> Result<SimpleForward, InstrumentError> {
        let curve = curves.curve(&self.forward_curve)?;
        Ok(SimpleForward::compute(
            curve,
            self.fixing_start,
            self.fixing_end,
            self.fixing_accrual,
        )?)
    }

    /// Projected forward rate.
    pub fn par_rate(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        Ok(self.forward(curves)?.rate)
    }

    /// `dF/dr(t)` on the forward curve.
    pub fn par_rate_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let fwd = self.forward(curves)?;
        Ok(CurveSensitivity::from_curve(
            self.forward_curve.clone(),
            fwd.scaled_sensitivities(1.0),
        ))
    }

    /// `N τ (F - K) P_d(t_p)`.
    pub fn present_value(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        let fwd = self.forward(curves)?;
        let df = curves.curve(&self.discount_curve)?.discount_factor(self.payment_time)?;
        Ok(self.notional * self.accrual * (fwd.rate - self.rate) * df)
    }

    /// `dPV/dr(t)` on both curves.
    pub fn present_value_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let fwd = self.forward(curves)?;
        let df = curves.curve(&self.discount_curve)?.discount_factor(self.payment_time)?;
        let scale = self.notional * self.accrual;
        let discounting = vec![(
            self.payment_time,
            -self.payment_time * scale * (fwd.rate - self.rate) * df,
        )];
        Ok(CurveSensitivity::from_curve(self.discount_curve.clone(), discounting)
            .plus_curve(self.forward_curve.clone(), fwd.scaled_sensitivities(scale * df)))
    }
}
