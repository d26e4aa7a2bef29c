//! Outright FX forward between two currencies.

use super::error::InstrumentError;
use pricer_core::market_data::curves::{CurveProvider, YieldCurve};
use pricer_core::sensitivities::CurveSensitivity;
use pricer_core::types::Currency;

/// Exchange of `notional` units of the foreign currency against
/// `notional * rate` units of the domestic currency at `maturity`.
///
/// The rate is quoted in domestic units per foreign unit. Values are in
/// the domestic currency: the foreign leg is discounted on its own curve
/// and converted at the spot rate of the curve provider.
///
/// # Examples
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, CurveSet};
/// use pricer_core::market_data::FxMatrix;
/// use pricer_core::types::Currency;
/// use pricer_models::instruments::FxForward;
///
/// let fx = FxMatrix::new().with_currency(Currency::EUR, Currency::USD, 1.10).unwrap();
/// let mut curves = CurveSet::new().with_fx_matrix(fx);
/// curves.insert("USD-OIS", CurveEnum::flat(0.04));
/// curves.insert("EUR-OIS", CurveEnum::flat(0.02));
///
/// let fwd = FxForward::new("USD-OIS", "EUR-OIS", Currency::USD, Currency::EUR, 1.0, 1.12).unwrap();
/// let outright = fwd.par_rate(&curves).unwrap();
/// assert!((outright - 1.10 * 0.02_f64.exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxForward {
    domestic_curve: String,
    foreign_curve: String,
    domestic: Currency,
    foreign: Currency,
    maturity: f64,
    rate: f64,
    notional: f64,
}

impl FxForward {
    /// Forward exchanging one foreign unit at `maturity`.
    ///
    /// # Errors
    /// `InvalidParameter` if the currencies coincide, `maturity <= 0`, or
    /// the rate is not finite.
    pub fn new(
        domestic_curve: impl Into<String>,
        foreign_curve: impl Into<String>,
        domestic: Currency,
        foreign: Currency,
        maturity: f64,
        rate: f64,
    ) -> Result<Self, InstrumentError> {
        if domestic == foreign {
            return Err(InstrumentError::invalid_parameter(format!(
                "FX forward needs two currencies, got {} twice",
                domestic
            )));
        }
        if !(maturity > 0.0 && maturity.is_finite()) {
            return Err(InstrumentError::invalid_parameter(format!(
                "maturity must be positive, got {}",
                maturity
            )));
        }
        if !rate.is_finite() {
            return Err(InstrumentError::invalid_parameter(format!(
                "FX forward rate {} is not finite",
                rate
            )));
        }
        Ok(Self {
            domestic_curve: domestic_curve.into(),
            foreign_curve: foreign_curve.into(),
            domestic,
            foreign,
            maturity,
            rate,
            notional: 1.0,
        })
    }

    /// Set the foreign notional.
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Copy with a different forward rate.
    pub fn with_rate(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
    }

    /// Discount curve of the domestic leg.
    pub fn domestic_curve(&self) -> &str {
        &self.domestic_curve
    }

    /// Discount curve of the foreign leg.
    pub fn foreign_curve(&self) -> &str {
        &self.foreign_curve
    }

    /// Currency values are expressed in.
    pub fn domestic(&self) -> Currency {
        self.domestic
    }

    /// Currency delivered against the domestic amount.
    pub fn foreign(&self) -> Currency {
        self.foreign
    }

    /// Exchange time.
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Contract rate in domestic units per foreign unit.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Spot rate and the two discount factors at maturity.
    fn market(&self, curves: &dyn CurveProvider) -> Result<(f64, f64, f64), InstrumentError> {
        let spot = curves.fx_rate(self.foreign, self.domestic)?;
        let df_foreign = curves.curve(&self.foreign_curve)?.discount_factor(self.maturity)?;
        let df_domestic = curves.curve(&self.domestic_curve)?.discount_factor(self.maturity)?;
        Ok((spot, df_foreign, df_domestic))
    }

    /// Outright forward `S P_f(T) / P_d(T)`.
    pub fn par_rate(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        let (spot, df_foreign, df_domestic) = self.market(curves)?;
        Ok(spot * df_foreign / df_domestic)
    }

    /// `dF/dr(T)` on both curves.
    pub fn par_rate_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let outright = self.par_rate(curves)?;
        let t = self.maturity;
        Ok(CurveSensitivity::from_curve(self.foreign_curve.clone(), vec![(t, -t * outright)])
            .plus_curve(self.domestic_curve.clone(), vec![(t, t * outright)]))
    }

    /// `N (S P_f(T) - K P_d(T))` in the domestic currency.
    pub fn present_value(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        let (spot, df_foreign, df_domestic) = self.market(curves)?;
        Ok(self.notional * (spot * df_foreign - self.rate * df_domestic))
    }

    /// `dPV/dr(T)` on both curves.
    pub fn present_value_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let (spot, df_foreign, df_domestic) = self.market(curves)?;
        let t = self.maturity;
        let foreign = -t * self.notional * spot * df_foreign;
        let domestic = t * self.notional * self.rate * df_domestic;
        Ok(CurveSensitivity::from_curve(self.foreign_curve.clone(), vec![(t, foreign)])
            .plus_curve(self.domestic_curve.clone(), vec![(t, domestic)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::{CurveEnum, CurveSet};
    use pricer_core::market_data::{FxMatrix, MarketDataError};
    use pricer_core::types::CurrencyError;

    fn curves(usd: f64, eur: f64) -> CurveSet {
        let fx = FxMatrix::new()
            .with_currency(Currency::EUR, Currency::USD, 1.10)
            .unwrap();
        let mut set = CurveSet::new().with_fx_matrix(fx);
        set.insert("USD", CurveEnum::flat(usd));
        set.insert("EUR", CurveEnum::flat(eur));
        set
    }

    fn forward(rate: f64) -> FxForward {
        FxForward::new("USD", "EUR", Currency::USD, Currency::EUR, 2.0, rate).unwrap()
    }

    // ========================================
    // Valuation
    // ========================================

    #[test]
    fn test_par_rate_is_covered_interest_parity() {
        let outright = forward(1.0).par_rate(&curves(0.04, 0.01)).unwrap();
        assert_relative_eq!(outright, 1.10 * (2.0 * 0.03_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_at_par_is_worth_nothing() {
        let set = curves(0.04, 0.01);
        let fwd = forward(1.0).with_notional(1e6);
        let at_par = fwd.with_rate(fwd.par_rate(&set).unwrap());
        assert_relative_eq!(at_par.present_value(&set).unwrap(), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_inverted_quote_uses_inverse_spot() {
        let set = curves(0.04, 0.01);
        let usd_in_eur =
            FxForward::new("EUR", "USD", Currency::EUR, Currency::USD, 2.0, 0.9).unwrap();
        let eur_in_usd = forward(1.0 / 0.9);
        assert_relative_eq!(
            usd_in_eur.par_rate(&set).unwrap() * eur_in_usd.par_rate(&set).unwrap(),
            1.0,
            epsilon = 1e-14
        );
    }

    // ========================================
    // Sensitivities
    // ========================================

    #[test]
    fn test_sensitivities_match_bumps() {
        let h = 1e-6;
        let fwd = forward(1.15).with_notional(1e4);
        let pv = |usd: f64, eur: f64| fwd.present_value(&curves(usd, eur)).unwrap();
        let par = |usd: f64, eur: f64| fwd.par_rate(&curves(usd, eur)).unwrap();

        let pv_totals = fwd
            .present_value_sensitivity(&curves(0.04, 0.01))
            .unwrap()
            .total_by_curve();
        assert_relative_eq!(
            pv_totals["USD"],
            (pv(0.04 + h, 0.01) - pv(0.04 - h, 0.01)) / (2.0 * h),
            max_relative = 1e-6
        );
        assert_relative_eq!(
            pv_totals["EUR"],
            (pv(0.04, 0.01 + h) - pv(0.04, 0.01 - h)) / (2.0 * h),
            max_relative = 1e-6
        );

        let par_totals = fwd.par_rate_sensitivity(&curves(0.04, 0.01)).unwrap().total_by_curve();
        assert_relative_eq!(
            par_totals["USD"],
            (par(0.04 + h, 0.01) - par(0.04 - h, 0.01)) / (2.0 * h),
            max_relative = 1e-6
        );
        assert_relative_eq!(
            par_totals["EUR"],
            (par(0.04, 0.01 + h) - par(0.04, 0.01 - h)) / (2.0 * h),
            max_relative = 1e-6
        );
    }

    // ========================================
    // Errors
    // ========================================

    #[test]
    fn test_missing_spot_rate() {
        let mut set = CurveSet::new();
        set.insert("USD", CurveEnum::flat(0.04));
        set.insert("EUR", CurveEnum::flat(0.01));
        let err = forward(1.1).par_rate(&set).unwrap_err();
        assert_eq!(
            err,
            InstrumentError::MarketData(MarketDataError::Currency(CurrencyError::MissingRate {
                from: Currency::EUR,
                to: Currency::USD
            }))
        );
    }

    #[test]
    fn test_invalid_construction() {
        assert!(FxForward::new("USD", "USD", Currency::USD, Currency::USD, 1.0, 1.0).is_err());
        assert!(FxForward::new("USD", "EUR", Currency::USD, Currency::EUR, 0.0, 1.0).is_err());
        assert!(FxForward::new("USD", "EUR", Currency::USD, Currency::EUR, 1.0, f64::NAN).is_err());
    }
}
