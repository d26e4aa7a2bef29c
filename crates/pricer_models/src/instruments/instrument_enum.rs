//! Static dispatch over calibration instruments.

use super::{Cash, Fra, FxForward, Swap};
use pricer_core::market_data::curves::CurveProvider;
use pricer_core::sensitivities::CurveSensitivity;

use super::error::InstrumentError;

/// Instruments a curve can be calibrated to.
///
/// # Example
///
/// ```
/// use pricer_models::instruments::{Cash, RateInstrument};
///
/// let deposit: RateInstrument = Cash::new("USD-OIS", 0.0, 1.0, 0.05).unwrap().into();
/// assert_eq!(deposit.curve_names(), vec!["USD-OIS"]);
/// assert_eq!(deposit.rate(), 0.05);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RateInstrument {
    /// Cash deposit
    Cash(Cash),
    /// Forward rate agreement
    Fra(Fra),
    /// Fixed/floating swap
    Swap(Swap),
    /// Outright FX forward, valued in its domestic currency
    FxForward(FxForward),
}

impl RateInstrument {
    /// Names of the curves the instrument depends on, without duplicates.
    pub fn curve_names(&self) -> Vec<&str> {
        let mut names = match self {
            RateInstrument::Cash(cash) => vec![cash.curve()],
            RateInstrument::Fra(fra) => vec![fra.discount_curve(), fra.forward_curve()],
            RateInstrument::Swap(swap) => vec![swap.discount_curve(), swap.forward_curve()],
            RateInstrument::FxForward(fx) => vec![fx.domestic_curve(), fx.foreign_curve()],
        };
        names.dedup();
        names
    }

    /// Quoted rate.
    pub fn rate(&self) -> f64 {
        match self {
            RateInstrument::Cash(cash) => cash.rate(),
            RateInstrument::Fra(fra) => fra.rate(),
            RateInstrument::Swap(swap) => swap.fixed_leg().rate(),
            RateInstrument::FxForward(fx) => fx.rate(),
        }
    }

    /// Copy quoted at `rate`.
    pub fn with_rate(&self, rate: f64) -> Self {
        match self {
            RateInstrument::Cash(cash) => RateInstrument::Cash(cash.with_rate(rate)),
            RateInstrument::Fra(fra) => RateInstrument::Fra(fra.with_rate(rate)),
            RateInstrument::Swap(swap) => RateInstrument::Swap(swap.with_rate(rate)),
            RateInstrument::FxForward(fx) => RateInstrument::FxForward(fx.with_rate(rate)),
        }
    }

    /// Par rate under `curves`.
    pub fn par_rate(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        match self {
            RateInstrument::Cash(cash) => cash.par_rate(curves),
            RateInstrument::Fra(fra) => fra.par_rate(curves),
            RateInstrument::Swap(swap) => swap.par_rate(curves),
            RateInstrument::FxForward(fx) => fx.par_rate(curves),
        }
    }

    /// Par rate sensitivity to continuous zero rates.
    pub fn par_rate_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        match self {
            RateInstrument::Cash(cash) => cash.par_rate_sensitivity(curves),
            RateInstrument::Fra(fra) => fra.par_rate_sensitivity(curves),
            RateInstrument::Swap(swap) => swap.par_rate_sensitivity(curves),
            RateInstrument::FxForward(fx) => fx.par_rate_sensitivity(curves),
        }
    }

    /// Present value under `curves`.
    pub fn present_value(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        match self {
            RateInstrument::Cash(cash) => cash.present_value(curves),
            RateInstrument::Fra(fra) => fra.present_value(curves),
            RateInstrument::Swap(swap) => swap.present_value(curves),
            RateInstrument::FxForward(fx) => fx.present_value(curves),
        }
    }

    /// Present value sensitivity to continuous zero rates.
    pub fn present_value_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        match self {
            RateInstrument::Cash(cash) => cash.present_value_sensitivity(curves),
            RateInstrument::Fra(fra) => fra.present_value_sensitivity(curves),
            RateInstrument::Swap(swap) => swap.present_value_sensitivity(curves),
            RateInstrument::FxForward(fx) => fx.present_value_sensitivity(curves),
        }
    }
}

impl From<Cash> for RateInstrument {
    fn from(cash: Cash) -> Self {
        RateInstrument::Cash(cash)
    }
}

impl From<Fra> for RateInstrument {
    fn from(fra: Fra) -> Self {
        RateInstrument::Fra(fra)
    }
}

impl From<Swap> for RateInstrument {
    fn from(swap: Swap) -> Self {
        RateInstrument::Swap(swap)
    }
}

impl From<FxForward> for RateInstrument {
    fn from(fx: FxForward) -> Self {
        RateInstrument::FxForward(fx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{FixedLeg, FloatingLeg, SwapDirection};
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::{CurveEnum, CurveSet};
    use pricer_core::types::Currency;

    #[test]
    fn test_curve_names_deduplicated() {
        let fra: RateInstrument = Fra::new("C", "C", 1.0, 1.5, 0.02).unwrap().into();
        assert_eq!(fra.curve_names(), vec!["C"]);

        let swap: RateInstrument = Swap::new(
            "DSC",
            "FWD",
            FixedLeg::regular(0.0, 2.0, 1, 0.02).unwrap(),
            FloatingLeg::regular(0.0, 2.0, 2).unwrap(),
            SwapDirection::ReceiveFixed,
        )
        .into();
        assert_eq!(swap.curve_names(), vec!["DSC", "FWD"]);

        let fx: RateInstrument =
            FxForward::new("USD", "EUR", Currency::USD, Currency::EUR, 1.0, 1.1)
                .unwrap()
                .into();
        assert_eq!(fx.curve_names(), vec!["USD", "EUR"]);
        assert_eq!(fx.rate(), 1.1);
    }

    #[test]
    fn test_with_rate_reprices_to_zero() {
        let mut set = CurveSet::new();
        set.insert("C", CurveEnum::flat(0.04));
        let cash: RateInstrument = Cash::new("C", 0.0, 0.5, 0.01).unwrap().into();
        let par = cash.par_rate(&set).unwrap();
        let at_par = cash.with_rate(par);
        assert_eq!(at_par.rate(), par);
        assert_relative_eq!(at_par.present_value(&set).unwrap(), 0.0, epsilon = 1e-15);
    }
}
