//! Black-76 formula for options on forwards.
//!
//! **Call**: F·N(d₁) - K·N(d₂)
//! **Put**: K·N(-d₂) - F·N(-d₁)
//!
//! with d₁ = (ln(F/K) + σ²T/2) / (σ√T), d₂ = d₁ - σ√T. Prices are
//! undiscounted; multiply by the annuity or discount factor.

use super::distributions::{norm_cdf, norm_pdf};
use super::error::AnalyticalError;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to receive `F - K`.
    Call,
    /// Right to receive `K - F`.
    Put,
}

/// Black-76 pricer for a fixed forward and expiry.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{Black76, OptionType};
///
/// let black = Black76::new(0.03, 2.0).unwrap();
/// let call = black.price(0.03, 0.2, OptionType::Call).unwrap();
/// let put = black.price(0.03, 0.2, OptionType::Put).unwrap();
///
/// // ATM put-call parity: C - P = F - K = 0
/// assert!((call - put).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Black76 {
    forward: f64,
    expiry: f64,
}

impl Black76 {
    /// Creates a pricer.
    ///
    /// # Errors
    /// - `InvalidForward` if forward <= 0
    /// - `InvalidExpiry` if expiry < 0
    pub fn new(forward: f64, expiry: f64) -> Result<Self, AnalyticalError> {
        if !(forward > 0.0 && forward.is_finite()) {
            return Err(AnalyticalError::InvalidForward { forward });
        }
        if !(expiry >= 0.0 && expiry.is_finite()) {
            return Err(AnalyticalError::InvalidExpiry { expiry });
        }
        Ok(Self { forward, expiry })
    }

    /// Returns the forward.
    #[inline]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Returns the expiry.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    fn validate(strike: f64, volatility: f64) -> Result<(), AnalyticalError> {
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(AnalyticalError::InvalidStrike { strike });
        }
        if !(volatility >= 0.0 && volatility.is_finite()) {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }
        Ok(())
    }

    /// Undiscounted option price.
    ///
    /// Zero volatility or zero expiry gives the intrinsic value.
    pub fn price(
        &self,
        strike: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Result<f64, AnalyticalError> {
        Self::validate(strike, volatility)?;
        let f = self.forward;
        let std_dev = volatility * self.expiry.sqrt();
        if std_dev == 0.0 {
            return Ok(match option_type {
                OptionType::Call => (f - strike).max(0.0),
                OptionType::Put => (strike - f).max(0.0),
            });
        }
        let d1 = ((f / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
        let d2 = d1 - std_dev;
        Ok(match option_type {
            OptionType::Call => f * norm_cdf(d1) - strike * norm_cdf(d2),
            OptionType::Put => strike * norm_cdf(-d2) - f * norm_cdf(-d1),
        })
    }

    /// Undiscounted vega `dPrice/dσ = F φ(d₁) √T`, identical for calls and puts.
    pub fn vega(&self, strike: f64, volatility: f64) -> Result<f64, AnalyticalError> {
        Self::validate(strike, volatility)?;
        let sqrt_t = self.expiry.sqrt();
        let std_dev = volatility * sqrt_t;
        if std_dev == 0.0 {
            return Ok(0.0);
        }
        let d1 = ((self.forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
        Ok(self.forward * norm_pdf(d1) * sqrt_t)
    }
}
