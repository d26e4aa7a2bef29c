//! Simply compounded forward rates and their zero-rate sensitivities.

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::market_data::MarketDataError;

/// Forward `F = (P(s) / P(e) - 1) / τ` on one curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SimpleForward {
    pub rate: f64,
    /// `(s, dF/dr(s))` and `(e, dF/dr(e))`.
    pub sensitivities: [(f64, f64); 2],
}

impl SimpleForward {
    /// Forward over `[start, end]` with accrual `accrual`.
    pub fn compute<C: YieldCurve + ?Sized>(
        curve: &C,
        start: f64,
        end: f64,
        accrual: f64,
    ) -> Result<Self, MarketDataError> {
        let p_start = curve.discount_factor(start)?;
        let p_end = curve.discount_factor(end)?;
        let ratio = p_start / p_end;
        // dP(t)/dr(t) = -t P(t)
        Ok(Self {
            rate: (ratio - 1.0) / accrual,
            sensitivities: [
                (start, -start * ratio / accrual),
                (end, end * ratio / accrual),
            ],
        })
    }

    /// Sensitivities scaled by `factor`.
    pub fn scaled_sensitivities(&self, factor: f64) -> Vec<(f64, f64)> {
        self.sensitivities
            .iter()
            .map(|&(t, s)| (t, s * factor))
            .collect()
    }
}
