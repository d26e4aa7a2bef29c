//! SABR model with the Hagan implied volatility approximation.
//!
//! SABR (Stochastic Alpha, Beta, Rho) dynamics:
//! ```text
//! dF = alpha * F^beta * dW_F
//! d(alpha) = nu * alpha * dW_alpha
//! E[dW_F * dW_alpha] = rho * dt
//! ```
//!
//! The lognormal (Black) implied volatility follows Hagan et al. (2002).
//! Strikes within a relative `1e-10` of the forward use the ATM expansion.
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::sabr::SabrParameters;
//!
//! let params = SabrParameters::new(0.05, 0.5, -0.25, 0.5).unwrap();
//! let atm = params.volatility(0.05, 0.05, 1.0).unwrap();
//! let wing = params.volatility(0.05, 0.04, 1.0).unwrap();
//! assert!(wing > atm);
//! ```

use pricer_core::sensitivities::SabrParameter;
use pricer_core::types::ErrorCategory;
use thiserror::Error;

/// Relative forward/strike distance below which the ATM expansion is used.
const ATM_THRESHOLD: f64 = 1e-10;

/// SABR model errors.
///
/// # Variants
///
/// - `InvalidAlpha`: alpha not positive
/// - `InvalidBeta`: beta outside `[0, 1]`
/// - `InvalidRho`: rho outside `(-1, 1)`
/// - `InvalidNu`: nu negative
/// - `InvalidForward`, `InvalidStrike`: non-positive rates
/// - `InvalidExpiry`: negative expiry
/// - `NonFinite`: NaN or infinite volatility
///
/// ```
/// use pricer_models::models::sabr::SabrError;
///
/// let err = SabrError::InvalidAlpha(-0.1);
/// assert!(format!("{}", err).contains("-0.1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SabrError {
    /// Alpha must be positive.
    #[error("Invalid alpha: {0} (must be positive)")]
    InvalidAlpha(f64),

    /// Beta must lie in [0, 1].
    #[error("Invalid beta: {0} (must be in [0, 1])")]
    InvalidBeta(f64),

    /// Rho must lie in (-1, 1).
    #[error("Invalid rho: {0} (must be in (-1, 1))")]
    InvalidRho(f64),

    /// Nu must be non-negative.
    #[error("Invalid nu: {0} (must be non-negative)")]
    InvalidNu(f64),

    /// Forward must be positive.
    #[error("Invalid forward: F = {0} (must be positive)")]
    InvalidForward(f64),

    /// Strike must be positive.
    #[error("Invalid strike: K = {0} (must be positive)")]
    InvalidStrike(f64),

    /// Expiry must be non-negative.
    #[error("Invalid expiry: T = {0} (must be non-negative)")]
    InvalidExpiry(f64),

    /// Non-finite volatility.
    #[error("Non-finite volatility at strike {0}")]
    NonFinite(f64),
}

impl SabrError {
    /// Error category for reporting.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::InvalidArgument
    }
}

/// SABR parameter set `(alpha, beta, rho, nu)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrParameters {
    alpha: f64,
    beta: f64,
    rho: f64,
    nu: f64,
}

impl SabrParameters {
    /// Starting point for smile fits: `(0.05, 0.5, 0.0, 0.3)`.
    pub const DEFAULT_GUESS: SabrParameters = SabrParameters {
        alpha: 0.05,
        beta: 0.5,
        rho: 0.0,
        nu: 0.3,
    };

    /// Validated parameter set.
    ///
    /// # Errors
    ///
    /// One of `InvalidAlpha`, `InvalidBeta`, `InvalidRho`, `InvalidNu`.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> Result<Self, SabrError> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(SabrError::InvalidAlpha(alpha));
        }
        if !(0.0..=1.0).contains(&beta) {
            return Err(SabrError::InvalidBeta(beta));
        }
        if !(rho > -1.0 && rho < 1.0) {
            return Err(SabrError::InvalidRho(rho));
        }
        if !(nu >= 0.0 && nu.is_finite()) {
            return Err(SabrError::InvalidNu(nu));
        }
        Ok(Self {
            alpha,
            beta,
            rho,
            nu,
        })
    }

    /// Parameters from `[alpha, beta, rho, nu]`.
    pub fn from_array(values: [f64; 4]) -> Result<Self, SabrError> {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// `[alpha, beta, rho, nu]`.
    #[inline]
    pub fn to_array(&self) -> [f64; 4] {
        [self.alpha, self.beta, self.rho, self.nu]
    }

    /// Value of one parameter.
    #[inline]
    pub fn get(&self, parameter: SabrParameter) -> f64 {
        self.to_array()[parameter.index()]
    }

    /// Copy with one parameter replaced.
    pub fn with(&self, parameter: SabrParameter, value: f64) -> Result<Self, SabrError> {
        let mut values = self.to_array();
        values[parameter.index()] = value;
        Self::from_array(values)
    }

    /// Alpha.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Beta.
    #[inline]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Rho.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Nu.
    #[inline]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Black implied volatility at `strike`.
    ///
    /// # Errors
    ///
    /// `InvalidForward`, `InvalidStrike`, `InvalidExpiry` for bad inputs and
    /// `NonFinite` when the approximation breaks down.
    pub fn volatility(&self, forward: f64, strike: f64, expiry: f64) -> Result<f64, SabrError> {
        if !(forward > 0.0 && forward.is_finite()) {
            return Err(SabrError::InvalidForward(forward));
        }
        if !(strike > 0.0 && strike.is_finite()) {
            return Err(SabrError::InvalidStrike(strike));
        }
        if !(expiry >= 0.0 && expiry.is_finite()) {
            return Err(SabrError::InvalidExpiry(expiry));
        }
        let vol = hagan_volatility(forward, strike, expiry, self.to_array());
        if vol.is_finite() {
            Ok(vol)
        } else {
            Err(SabrError::NonFinite(strike))
        }
    }
}

/// Hagan lognormal volatility for raw `[alpha, beta, rho, nu]`.
///
/// Unchecked: used inside least-squares fits where parameters come from a
/// bounded transform.
pub(crate) fn hagan_volatility(forward: f64, strike: f64, expiry: f64, params: [f64; 4]) -> f64 {
    let [alpha, beta, rho, nu] = params;
    let one_minus_beta = 1.0 - beta;

    // Time-dependent correction shared by ATM and off-ATM forms
    let correction = |fk_mid: f64| {
        let term1 = one_minus_beta * one_minus_beta * alpha * alpha / (24.0 * fk_mid * fk_mid);
        let term2 = 0.25 * rho * beta * nu * alpha / fk_mid;
        let term3 = (2.0 - 3.0 * rho * rho) * nu * nu / 24.0;
        1.0 + (term1 + term2 + term3) * expiry
    };

    if (forward - strike).abs() < ATM_THRESHOLD * forward {
        let f_pow = forward.powf(one_minus_beta);
        return alpha / f_pow * correction(f_pow);
    }

    let log_fk = (forward / strike).ln();
    let fk_mid = (forward * strike).powf(one_minus_beta / 2.0);

    // z = (nu/alpha) * (FK)^((1-beta)/2) * ln(F/K)
    let z = (nu / alpha) * fk_mid * log_fk;
    // chi(z) = ln[(sqrt(1-2*rho*z+z^2)+z-rho)/(1-rho)]
    let sqrt_term = (1.0 - 2.0 * rho * z + z * z).sqrt();
    let chi_z = ((sqrt_term + z - rho) / (1.0 - rho)).ln();
    let z_over_chi = if chi_z.abs() < ATM_THRESHOLD { 1.0 } else { z / chi_z };

    let log_fk_2 = log_fk * log_fk;
    let one_minus_beta_2 = one_minus_beta * one_minus_beta;
    let denom = 1.0
        + one_minus_beta_2 * log_fk_2 / 24.0
        + one_minus_beta_2 * one_minus_beta_2 * log_fk_2 * log_fk_2 / 1920.0;

    (alpha / fk_mid) * z_over_chi * correction(fk_mid) / denom
}
