//! Fixed/floating interest rate swap.
//!
//! # Structure
//!
//! - Fixed leg: `K Σ α_i P_d(t_i)`
//! - Floating leg: `Σ τ_j (F_j + s) P_d(p_j)` with `F_j` projected on the
//!   forward curve
//!
//! # Example
//!
//! ```
//! use pricer_models::instruments::{FixedLeg, FloatingLeg, Swap, SwapDirection};
//!
//! let fixed = FixedLeg::regular(0.0, 5.0, 1, 0.03).unwrap();
//! let floating = FloatingLeg::regular(0.0, 5.0, 4).unwrap();
//! let swap = Swap::new("USD-OIS", "USD-LIBOR-3M", fixed, floating, SwapDirection::PayFixed);
//!
//! assert_eq!(swap.fixed_leg().payment_times().len(), 5);
//! assert_eq!(swap.floating_leg().periods().len(), 20);
//! ```

use super::error::InstrumentError;
use super::forward::SimpleForward;
use pricer_core::market_data::curves::{CurveProvider, YieldCurve};
use pricer_core::sensitivities::CurveSensitivity;

/// Which leg the holder pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapDirection {
    /// Pay fixed, receive floating.
    PayFixed,
    /// Receive fixed, pay floating.
    ReceiveFixed,
}

impl SwapDirection {
    /// `+1` for payer, `-1` for receiver.
    #[inline]
    pub fn sign(&self) -> f64 {
        match self {
            SwapDirection::PayFixed => 1.0,
            SwapDirection::ReceiveFixed => -1.0,
        }
    }
}

/// Regular period boundaries `start, start + 1/f, ..., maturity`.
fn regular_boundaries(
    start: f64,
    maturity: f64,
    frequency: u32,
) -> Result<Vec<f64>, InstrumentError> {
    if frequency == 0 || !(start >= 0.0 && maturity > start && maturity.is_finite()) {
        return Err(InstrumentError::invalid_schedule(format!(
            "cannot build schedule from {} to {} at frequency {}",
            start, maturity, frequency
        )));
    }
    let step = 1.0 / frequency as f64;
    let periods = ((maturity - start) / step).round();
    if periods < 1.0 || ((maturity - start) - periods * step).abs() > 1e-9 {
        return Err(InstrumentError::invalid_schedule(format!(
            "{} to {} is not a whole number of periods at frequency {}",
            start, maturity, frequency
        )));
    }
    let n = periods as usize;
    Ok((0..=n)
        .map(|i| if i == n { maturity } else { start + i as f64 * step })
        .collect())
}

/// Fixed leg cash flows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FixedLeg {
    payment_times: Vec<f64>,
    accruals: Vec<f64>,
    rate: f64,
}

impl FixedLeg {
    /// Leg from explicit payment times and accrual factors.
    ///
    /// # Errors
    /// `InvalidSchedule` if empty, mismatched, unsorted or with
    /// non-positive accruals.
    pub fn new(
        payment_times: Vec<f64>,
        accruals: Vec<f64>,
        rate: f64,
    ) -> Result<Self, InstrumentError> {
        if payment_times.is_empty() || payment_times.len() != accruals.len() {
            return Err(InstrumentError::invalid_schedule(format!(
                "{} payment times with {} accruals",
                payment_times.len(),
                accruals.len()
            )));
        }
        if payment_times[0] < 0.0 || payment_times.windows(2).any(|w| w[1] <= w[0]) {
            return Err(InstrumentError::invalid_schedule(
                "payment times must be non-negative and increasing",
            ));
        }
        if accruals.iter().any(|&a| !(a > 0.0)) {
            return Err(InstrumentError::invalid_schedule("accruals must be positive"));
        }
        Ok(Self {
            payment_times,
            accruals,
            rate,
        })
    }

    /// Regular leg paying `frequency` times a year.
    pub fn regular(
        start: f64,
        maturity: f64,
        frequency: u32,
        rate: f64,
    ) -> Result<Self, InstrumentError> {
        let bounds = regular_boundaries(start, maturity, frequency)?;
        let accruals = bounds.windows(2).map(|w| w[1] - w[0]).collect();
        Self::new(bounds[1..].to_vec(), accruals, rate)
    }

    /// Payment times.
    pub fn payment_times(&self) -> &[f64] {
        &self.payment_times
    }

    /// Accrual factors.
    pub fn accruals(&self) -> &[f64] {
        &self.accruals
    }

    /// Fixed rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

/// One floating period.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatingPeriod {
    /// Fixing period start.
    pub start: f64,
    /// Fixing period end.
    pub end: f64,
    /// Payment time.
    pub payment: f64,
    /// Payment accrual factor.
    pub accrual: f64,
}

/// Floating leg projected on a forward curve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatingLeg {
    periods: Vec<FloatingPeriod>,
    spread: f64,
}

impl FloatingLeg {
    /// Leg from explicit periods.
    ///
    /// # Errors
    /// `InvalidSchedule` if empty or a period is not a forward interval.
    pub fn new(periods: Vec<FloatingPeriod>) -> Result<Self, InstrumentError> {
        if periods.is_empty() {
            return Err(InstrumentError::invalid_schedule("floating leg has no periods"));
        }
        if let Some(p) = periods
            .iter()
            .find(|p| !(p.start >= 0.0 && p.end > p.start && p.accrual > 0.0 && p.payment >= 0.0))
        {
            return Err(InstrumentError::invalid_schedule(format!(
                "invalid floating period [{}, {}]",
                p.start, p.end
            )));
        }
        Ok(Self {
            periods,
            spread: 0.0,
        })
    }

    /// Regular leg fixing and paying `frequency` times a year, paid at
    /// period end.
    pub fn regular(start: f64, maturity: f64, frequency: u32) -> Result<Self, InstrumentError> {
        let bounds = regular_boundaries(start, maturity, frequency)?;
        Self::new(
            bounds
                .windows(2)
                .map(|w| FloatingPeriod {
                    start: w[0],
                    end: w[1],
                    payment: w[1],
                    accrual: w[1] - w[0],
                })
                .collect(),
        )
    }

    /// Set the spread over the index.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Periods.
    pub fn periods(&self) -> &[FloatingPeriod] {
        &self.periods
    }

    /// Spread.
    pub fn spread(&self) -> f64 {
        self.spread
    }
}

/// Vanilla interest rate swap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swap {
    discount_curve: String,
    forward_curve: String,
    fixed: FixedLeg,
    floating: FloatingLeg,
    direction: SwapDirection,
    notional: f64,
}

/// Leg values and their sensitivities at one curve state.
struct LegValues {
    /// `Σ α_i P_d(t_i)`
    annuity: f64,
    /// `Σ τ_j (F_j + s) P_d(p_j)`
    floating: f64,
    annuity_sensitivity: CurveSensitivity,
    floating_sensitivity: CurveSensitivity,
}

impl Swap {
    /// Swap with unit notional.
    pub fn new(
        discount_curve: impl Into<String>,
        forward_curve: impl Into<String>,
        fixed: FixedLeg,
        floating: FloatingLeg,
        direction: SwapDirection,
    ) -> Self {
        Self {
            discount_curve: discount_curve.into(),
            forward_curve: forward_curve.into(),
            fixed,
            floating,
            direction,
            notional: 1.0,
        }
    }

    /// Set the notional.
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Copy with a different fixed rate.
    pub fn with_rate(&self, rate: f64) -> Self {
        let mut swap = self.clone();
        swap.fixed.rate = rate;
        swap
    }

    /// Discount curve name.
    pub fn discount_curve(&self) -> &str {
        &self.discount_curve
    }

    /// Forward curve name.
    pub fn forward_curve(&self) -> &str {
        &self.forward_curve
    }

    /// Fixed leg.
    pub fn fixed_leg(&self) -> &FixedLeg {
        &self.fixed
    }

    /// Floating leg.
    pub fn floating_leg(&self) -> &FloatingLeg {
        &self.floating
    }

    /// Direction.
    pub fn direction(&self) -> SwapDirection {
        self.direction
    }

    /// Notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    fn legs(&self, curves: &dyn CurveProvider) -> Result<LegValues, InstrumentError> {
        let discount = curves.curve(&self.discount_curve)?;
        let forward = curves.curve(&self.forward_curve)?;

        let mut annuity = 0.0;
        let mut annuity_points = Vec::with_capacity(self.fixed.payment_times.len());
        for (&t, &alpha) in self.fixed.payment_times.iter().zip(&self.fixed.accruals) {
            let df = discount.discount_factor(t)?;
            annuity += alpha * df;
            annuity_points.push((t, -t * alpha * df));
        }

        let mut floating = 0.0;
        let mut discount_points = Vec::with_capacity(self.floating.periods.len());
        let mut forward_points = Vec::with_capacity(2 * self.floating.periods.len());
        for period in &self.floating.periods {
            let fwd = SimpleForward::compute(
                forward,
                period.start,
                period.end,
                period.end - period.start,
            )?;
            let df = discount.discount_factor(period.payment)?;
            let coupon = period.accrual * (fwd.rate + self.floating.spread);
            floating += coupon * df;
            discount_points.push((period.payment, -period.payment * coupon * df));
            forward_points.extend(fwd.scaled_sensitivities(period.accrual * df));
        }

        let annuity_sensitivity =
            CurveSensitivity::from_curve(self.discount_curve.clone(), annuity_points);
        let floating_sensitivity =
            CurveSensitivity::from_curve(self.discount_curve.clone(), discount_points)
                .plus_curve(self.forward_curve.clone(), forward_points);
        Ok(LegValues {
            annuity,
            floating,
            annuity_sensitivity,
            floating_sensitivity,
        })
    }

    /// Fixed rate making the swap worth zero.
    pub fn par_rate(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        let legs = self.legs(curves)?;
        if legs.annuity == 0.0 {
            return Err(InstrumentError::ZeroAnnuity);
        }
        Ok(legs.floating / legs.annuity)
    }

    /// `d(par)/dr(t) = (dFloat - par dA) / A`.
    pub fn par_rate_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let legs = self.legs(curves)?;
        if legs.annuity == 0.0 {
            return Err(InstrumentError::ZeroAnnuity);
        }
        let par = legs.floating / legs.annuity;
        Ok(legs
            .floating_sensitivity
            .plus(&legs.annuity_sensitivity.multiplied_by(-par))
            .multiplied_by(1.0 / legs.annuity))
    }

    /// `±N (Float - K A)`, positive for the fixed payer when rates rise.
    pub fn present_value(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        let legs = self.legs(curves)?;
        Ok(self.direction.sign() * self.notional * (legs.floating - self.fixed.rate * legs.annuity))
    }

    /// `dPV/dr(t)` on both curves.
    pub fn present_value_sensitivity(
        &self,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        let legs = self.legs(curves)?;
        Ok(legs
            .floating_sensitivity
            .plus(&legs.annuity_sensitivity.multiplied_by(-self.fixed.rate))
            .multiplied_by(self.direction.sign() * self.notional))
    }

    /// Discount-curve annuity `Σ α_i P_d(t_i)`.
    pub fn annuity(&self, curves: &dyn CurveProvider) -> Result<f64, InstrumentError> {
        Ok(self.legs(curves)?.annuity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::{
        CurveEnum, CurveInterpolation, CurveSet, InterpolatedCurve,
    };

    fn curves() -> CurveSet {
        let times = [0.5, 1.0, 2.0, 3.0, 5.0];
        let linear = |rates: [f64; 5]| {
            InterpolatedCurve::new(&times, &rates, CurveInterpolation::Linear, true).unwrap()
        };
        let dsc = linear([0.010, 0.012, 0.015, 0.017, 0.020]);
        let fwd = linear([0.020, 0.022, 0.025, 0.026, 0.028]);
        let mut set = CurveSet::new();
        set.insert("DSC", dsc.into());
        set.insert("FWD", fwd.into());
        set
    }

    fn swap() -> Swap {
        Swap::new(
            "DSC",
            "FWD",
            FixedLeg::regular(0.0, 3.0, 1, 0.025).unwrap(),
            FloatingLeg::regular(0.0, 3.0, 4).unwrap(),
            SwapDirection::PayFixed,
        )
        .with_notional(1e4)
    }

    /// Bump every node of one curve in parallel.
    fn shifted(name: &str, h: f64) -> CurveSet {
        let mut set = curves();
        let curve = set.get(name).unwrap().clone();
        let bumped: Vec<f64> = curve.parameters().iter().map(|r| r + h).collect();
        set.insert(name, curve.with_parameters(&bumped).unwrap());
        set
    }

    // ========================================
    // Schedules
    // ========================================

    #[test]
    fn test_regular_schedule() {
        let leg = FixedLeg::regular(1.0, 3.0, 2, 0.01).unwrap();
        assert_eq!(leg.payment_times(), &[1.5, 2.0, 2.5, 3.0]);
        assert!(leg.accruals().iter().all(|&a| (a - 0.5).abs() < 1e-15));
    }

    #[test]
    fn test_irregular_schedule_rejected() {
        assert!(matches!(
            FixedLeg::regular(0.0, 1.3, 2, 0.01),
            Err(InstrumentError::InvalidSchedule { .. })
        ));
        assert!(FloatingLeg::regular(0.0, 1.0, 0).is_err());
        assert!(FixedLeg::new(vec![1.0, 0.5], vec![0.5, 0.5], 0.01).is_err());
    }

    // ========================================
    // Valuation
    // ========================================

    #[test]
    fn test_present_value_zero_at_par() {
        let set = curves();
        let par = swap().par_rate(&set).unwrap();
        assert_relative_eq!(
            swap().with_rate(par).present_value(&set).unwrap(),
            0.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_direction_flips_sign() {
        let set = curves();
        let payer = swap().present_value(&set).unwrap();
        let receiver = Swap::new(
            "DSC",
            "FWD",
            swap().fixed_leg().clone(),
            swap().floating_leg().clone(),
            SwapDirection::ReceiveFixed,
        )
        .with_notional(1e4)
        .present_value(&set)
        .unwrap();
        assert_relative_eq!(payer, -receiver, epsilon = 1e-12);
    }

    #[test]
    fn test_single_curve_par_rate() {
        // Discounting and projecting on one curve: par = (1 - P(T)) / A
        let mut set = CurveSet::new();
        set.insert("C", CurveEnum::flat(0.03));
        let swap = Swap::new(
            "C",
            "C",
            FixedLeg::regular(0.0, 2.0, 2, 0.0).unwrap(),
            FloatingLeg::regular(0.0, 2.0, 2).unwrap(),
            SwapDirection::PayFixed,
        );
        let annuity = swap.annuity(&set).unwrap();
        let expected = (1.0 - (-0.06_f64).exp()) / annuity;
        assert_relative_eq!(swap.par_rate(&set).unwrap(), expected, epsilon = 1e-14);
    }

    // ========================================
    // Sensitivities
    // ========================================

    #[test]
    fn test_present_value_sensitivity_parallel_bumps() {
        let h = 1e-6;
        let totals = swap().present_value_sensitivity(&curves()).unwrap().total_by_curve();
        for name in ["DSC", "FWD"] {
            let fd = (swap().present_value(&shifted(name, h)).unwrap()
                - swap().present_value(&shifted(name, -h)).unwrap())
                / (2.0 * h);
            assert_relative_eq!(totals[name], fd, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_par_rate_sensitivity_parallel_bumps() {
        let h = 1e-6;
        let totals = swap().par_rate_sensitivity(&curves()).unwrap().total_by_curve();
        for name in ["DSC", "FWD"] {
            let fd = (swap().par_rate(&shifted(name, h)).unwrap()
                - swap().par_rate(&shifted(name, -h)).unwrap())
                / (2.0 * h);
            assert_relative_eq!(totals[name], fd, epsilon = 1e-8);
        }
    }
}
