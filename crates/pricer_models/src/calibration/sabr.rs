//! SABR smile calibration.
//!
//! Fits the Hagan SABR approximation to one Black volatility smile by
//! Levenberg-Marquardt least squares.
//!
//! ## Calibration Approach
//!
//! Residuals are `(σ_model(K_i) - σ_market(K_i)) / e_i` for observation
//! errors `e_i`. Free parameters are fitted in an unconstrained space:
//!
//! ```text
//! alpha = exp(u)      nu  = exp(u)
//! rho   = tanh(u)     beta = 1 / (1 + exp(-u))
//! ```
//!
//! Parameters flagged in [`SabrFitConfig::fixed`] keep their initial value.
//!
//! ## Inverse Jacobian
//!
//! At the fitted point the sensitivity of the parameters to the market
//! volatilities is
//!
//! ```text
//! dθ/dσ = diag(dθ/du) (JᵀJ)⁻¹ Jᵀ diag(1/e)
//! ```
//!
//! returned as a `4 x n` matrix in `(alpha, beta, rho, nu)` row order with
//! zero rows for fixed parameters.

use super::CalibrationError;
use crate::models::sabr::hagan_volatility;
use crate::models::SabrParameters;
use nalgebra::DMatrix;
use pricer_core::math::solvers::{LMConfig, LevenbergMarquardtSolver};
use pricer_core::sensitivities::SabrParameter;
use tracing::{debug, warn};

/// Floor applied to positive parameters before taking logarithms.
const POSITIVE_FLOOR: f64 = 1e-8;

/// Default minimum number of strikes per smile.
pub const DEFAULT_MIN_STRIKES: usize = 5;

/// Default weighted RMS residual above which a fit is logged as poor.
pub const DEFAULT_WARN_RMS: f64 = 1e-3;

/// One observed Black volatility smile.
///
/// # Example
///
/// ```
/// use pricer_models::calibration::SabrSmile;
///
/// let smile = SabrSmile::from_offsets(0.05, 1.0, &[-0.01, 0.0, 0.01], vec![0.25, 0.22, 0.21]);
/// assert_eq!(smile.len(), 3);
/// assert_eq!(smile.strikes[1], 0.05);
/// assert_eq!(smile.errors, vec![1.0; 3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrSmile {
    /// At-the-money forward rate.
    pub forward: f64,
    /// Option expiry (years).
    pub expiry: f64,
    /// Absolute strikes.
    pub strikes: Vec<f64>,
    /// Market Black volatilities at `strikes`.
    pub volatilities: Vec<f64>,
    /// Observation errors; residuals are divided by these.
    pub errors: Vec<f64>,
}

impl SabrSmile {
    /// Smile with unit observation errors.
    pub fn new(forward: f64, expiry: f64, strikes: Vec<f64>, volatilities: Vec<f64>) -> Self {
        let errors = vec![1.0; strikes.len()];
        Self {
            forward,
            expiry,
            strikes,
            volatilities,
            errors,
        }
    }

    /// Smile at strikes `forward + offset`.
    pub fn from_offsets(
        forward: f64,
        expiry: f64,
        offsets: &[f64],
        volatilities: Vec<f64>,
    ) -> Self {
        Self::new(
            forward,
            expiry,
            offsets.iter().map(|o| forward + o).collect(),
            volatilities,
        )
    }

    /// Set the observation errors.
    pub fn with_errors(mut self, errors: Vec<f64>) -> Self {
        self.errors = errors;
        self
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// True if the smile has no quotes.
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Validate the quotes against a minimum strike count.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - Fewer than `min_strikes` quotes
    /// * `InvalidMarketData` - Non-positive forward, strike, volatility or
    ///   error, non-positive expiry, or mismatched lengths
    pub fn validate(&self, min_strikes: usize) -> Result<(), CalibrationError> {
        if self.strikes.len() < min_strikes {
            return Err(CalibrationError::insufficient_data(min_strikes, self.strikes.len()));
        }
        let n = self.strikes.len();
        if self.volatilities.len() != n || self.errors.len() != n {
            return Err(CalibrationError::invalid_market_data(format!(
                "{} strikes, {} volatilities, {} errors",
                self.strikes.len(),
                self.volatilities.len(),
                self.errors.len()
            )));
        }
        if !(self.forward > 0.0 && self.forward.is_finite()) {
            return Err(CalibrationError::invalid_market_data(format!(
                "forward must be positive, got {}",
                self.forward
            )));
        }
        if !(self.expiry > 0.0 && self.expiry.is_finite()) {
            return Err(CalibrationError::invalid_market_data(format!(
                "expiry must be positive, got {}",
                self.expiry
            )));
        }
        for (i, ((&k, &vol), &err)) in self
            .strikes
            .iter()
            .zip(&self.volatilities)
            .zip(&self.errors)
            .enumerate()
        {
            if !(k > 0.0 && k.is_finite()) {
                return Err(CalibrationError::invalid_market_data(format!(
                    "quote {}: strike must be positive, got {}",
                    i, k
                )));
            }
            if !(vol > 0.0 && vol.is_finite()) {
                return Err(CalibrationError::invalid_market_data(format!(
                    "quote {}: volatility must be positive, got {}",
                    i, vol
                )));
            }
            if !(err > 0.0 && err.is_finite()) {
                return Err(CalibrationError::invalid_market_data(format!(
                    "quote {}: observation error must be positive, got {}",
                    i, err
                )));
            }
        }
        Ok(())
    }
}

/// SABR fit settings.
///
/// Defaults: initial guess `(0.05, 0.5, 0.0, 0.3)`, beta fixed, at least
/// [`DEFAULT_MIN_STRIKES`] strikes, default LM settings. Converged fits
/// whose weighted RMS residual exceeds `warn_rms` are logged at `warn`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrFitConfig {
    /// Starting point and values of fixed parameters.
    pub initial: SabrParameters,
    /// Parameters held at their initial value, `(alpha, beta, rho, nu)` order.
    pub fixed: [bool; 4],
    /// Minimum strikes per smile.
    pub min_strikes: usize,
    /// Least-squares solver settings.
    pub lm: LMConfig,
    /// Weighted RMS residual above which a converged fit is reported.
    pub warn_rms: f64,
}

impl Default for SabrFitConfig {
    fn default() -> Self {
        Self {
            initial: SabrParameters::DEFAULT_GUESS,
            fixed: [false, true, false, false],
            min_strikes: DEFAULT_MIN_STRIKES,
            lm: LMConfig::default(),
            warn_rms: DEFAULT_WARN_RMS,
        }
    }
}

impl SabrFitConfig {
    /// Set the initial guess.
    pub fn with_initial(mut self, initial: SabrParameters) -> Self {
        self.initial = initial;
        self
    }

    /// Hold `parameter` fixed at its initial value, or free it.
    pub fn with_fixed(mut self, parameter: SabrParameter, fixed: bool) -> Self {
        self.fixed[parameter.index()] = fixed;
        self
    }

    /// Set the minimum strike count.
    pub fn with_min_strikes(mut self, min_strikes: usize) -> Self {
        self.min_strikes = min_strikes;
        self
    }

    /// Set the LM settings.
    pub fn with_lm(mut self, lm: LMConfig) -> Self {
        self.lm = lm;
        self
    }

    /// Set the RMS residual that flags a poor fit.
    pub fn with_warn_rms(mut self, warn_rms: f64) -> Self {
        self.warn_rms = warn_rms;
        self
    }

    /// True if `parameter` is held fixed.
    pub fn is_fixed(&self, parameter: SabrParameter) -> bool {
        self.fixed[parameter.index()]
    }

    fn free_parameters(&self) -> Vec<SabrParameter> {
        SabrParameter::ALL
            .into_iter()
            .filter(|p| !self.is_fixed(*p))
            .collect()
    }
}

/// Outcome of a converged smile fit.
#[derive(Debug, Clone, PartialEq)]
pub struct SabrFitResult {
    /// Fitted parameters.
    pub parameters: SabrParameters,
    /// `dθ/dσ_market`, `4 x n`, rows in `(alpha, beta, rho, nu)` order.
    pub inverse_jacobian: DMatrix<f64>,
    /// Sum of squared weighted residuals.
    pub chi_squared: f64,
    /// `sqrt(chi_squared / n)`.
    pub rms_residual: f64,
    /// LM iterations.
    pub iterations: usize,
}

/// Unconstrained coordinate of a parameter value.
fn to_unconstrained(parameter: SabrParameter, value: f64) -> f64 {
    match parameter {
        SabrParameter::Alpha | SabrParameter::Nu => value.max(POSITIVE_FLOOR).ln(),
        SabrParameter::Beta => {
            let b = value.clamp(POSITIVE_FLOOR, 1.0 - POSITIVE_FLOOR);
            (b / (1.0 - b)).ln()
        }
        SabrParameter::Rho => value.atanh(),
    }
}

/// Parameter value and `dθ/du` at an unconstrained coordinate.
fn from_unconstrained(parameter: SabrParameter, u: f64) -> (f64, f64) {
    match parameter {
        SabrParameter::Alpha | SabrParameter::Nu => {
            let v = u.exp();
            (v, v)
        }
        SabrParameter::Beta => {
            let b = 1.0 / (1.0 + (-u).exp());
            (b, b * (1.0 - b))
        }
        SabrParameter::Rho => {
            let r = u.tanh();
            (r, 1.0 - r * r)
        }
    }
}

/// Least-squares SABR smile fitter.
///
/// # Example
///
/// ```
/// use pricer_models::calibration::{SabrFitConfig, SabrSmile, SabrSmileFitter};
/// use pricer_models::models::SabrParameters;
///
/// let truth = SabrParameters::new(0.05, 0.5, -0.25, 0.5).unwrap();
/// let offsets = [-0.01, -0.005, -0.0025, 0.0, 0.0025, 0.005, 0.01];
/// let vols = offsets
///     .iter()
///     .map(|o| truth.volatility(0.05, 0.05 + o, 2.0).unwrap())
///     .collect();
///
/// let fit = SabrSmileFitter::new(SabrFitConfig::default())
///     .fit(&SabrSmile::from_offsets(0.05, 2.0, &offsets, vols))
///     .unwrap();
/// assert!((fit.parameters.rho() + 0.25).abs() < 1e-6);
/// assert_eq!(fit.inverse_jacobian.shape(), (4, 7));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SabrSmileFitter {
    config: SabrFitConfig,
}

impl SabrSmileFitter {
    /// Fitter with the given settings.
    pub fn new(config: SabrFitConfig) -> Self {
        Self { config }
    }

    /// Fit settings.
    pub fn config(&self) -> &SabrFitConfig {
        &self.config
    }

    /// Fit one smile.
    ///
    /// # Errors
    ///
    /// * `InsufficientData`, `InvalidMarketData` - See [`SabrSmile::validate`]
    /// * `InvalidConfig` - Every parameter fixed
    /// * `ConvergenceFailure` - LM stopped without converging
    /// * `Solver` - Singular normal matrix at the fitted point
    pub fn fit(&self, smile: &SabrSmile) -> Result<SabrFitResult, CalibrationError> {
        smile.validate(self.config.min_strikes)?;
        let free = self.config.free_parameters();
        if free.is_empty() {
            return Err(CalibrationError::invalid_config("every SABR parameter is fixed"));
        }

        let base = self.config.initial.to_array();
        let assemble = |u: &[f64]| -> ([f64; 4], Vec<f64>) {
            let mut values = base;
            let mut derivatives = Vec::with_capacity(free.len());
            for (p, &x) in free.iter().zip(u) {
                let (v, dv) = from_unconstrained(*p, x);
                values[p.index()] = v;
                derivatives.push(dv);
            }
            (values, derivatives)
        };

        let residuals = |u: &[f64]| -> Vec<f64> {
            let (values, _) = assemble(u);
            smile
                .strikes
                .iter()
                .zip(&smile.volatilities)
                .zip(&smile.errors)
                .map(|((&k, &vol), &err)| {
                    (hagan_volatility(smile.forward, k, smile.expiry, values) - vol) / err
                })
                .collect()
        };

        let initial: Vec<f64> = free
            .iter()
            .map(|p| to_unconstrained(*p, base[p.index()]))
            .collect();
        let result = LevenbergMarquardtSolver::new(self.config.lm).solve(residuals, initial)?;
        if !result.converged {
            return Err(CalibrationError::convergence_failure(
                result.iterations,
                result.residual_ss,
            ));
        }

        let (values, derivatives) = assemble(&result.params);
        let parameters = SabrParameters::from_array(values)?;

        let du_dr = result.inverse_jacobian()?;
        let mut inverse_jacobian = DMatrix::zeros(4, smile.len());
        for (row, (p, dv)) in free.iter().zip(&derivatives).enumerate() {
            for (col, err) in smile.errors.iter().enumerate() {
                inverse_jacobian[(p.index(), col)] = dv * du_dr[(row, col)] / err;
            }
        }

        let rms_residual = (result.residual_ss / smile.len() as f64).sqrt();
        if rms_residual > self.config.warn_rms {
            warn!(
                forward = smile.forward,
                expiry = smile.expiry,
                chi_squared = result.residual_ss,
                rms = rms_residual,
                "sabr fit converged with large residuals"
            );
        } else {
            debug!(
                forward = smile.forward,
                expiry = smile.expiry,
                iterations = result.iterations,
                chi_squared = result.residual_ss,
                "sabr smile fitted"
            );
        }

        Ok(SabrFitResult {
            parameters,
            inverse_jacobian,
            chi_squared: result.residual_ss,
            rms_residual,
            iterations: result.iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FORWARD: f64 = 0.05;
    const EXPIRY: f64 = 2.0;
    const OFFSETS: [f64; 7] = [-0.01, -0.005, -0.0025, 0.0, 0.0025, 0.005, 0.01];

    fn truth() -> SabrParameters {
        SabrParameters::new(0.05, 0.5, -0.25, 0.5).unwrap()
    }

    fn smile_from(params: &SabrParameters) -> SabrSmile {
        let vols = OFFSETS
            .iter()
            .map(|o| params.volatility(FORWARD, FORWARD + o, EXPIRY).unwrap())
            .collect();
        SabrSmile::from_offsets(FORWARD, EXPIRY, &OFFSETS, vols)
    }

    // ========================================
    // Validation
    // ========================================

    #[test]
    fn test_too_few_strikes() {
        let smile = SabrSmile::new(0.05, 1.0, vec![0.04, 0.05, 0.06], vec![0.2; 3]);
        let err = SabrSmileFitter::default().fit(&smile).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::InsufficientData {
                required: 5,
                provided: 3
            }
        );
    }

    #[test]
    fn test_non_positive_forward() {
        let smile = SabrSmile::from_offsets(-0.001, 1.0, &OFFSETS, vec![0.2; 7]);
        assert!(matches!(
            SabrSmileFitter::default().fit(&smile),
            Err(CalibrationError::InvalidMarketData { .. })
        ));
    }

    #[test]
    fn test_mismatched_lengths() {
        let smile = smile_from(&truth()).with_errors(vec![1.0; 2]);
        assert!(matches!(
            smile.validate(5),
            Err(CalibrationError::InvalidMarketData { .. })
        ));
    }

    #[test]
    fn test_all_fixed_rejected() {
        let config = SabrFitConfig {
            fixed: [true; 4],
            ..Default::default()
        };
        assert!(matches!(
            SabrSmileFitter::new(config).fit(&smile_from(&truth())),
            Err(CalibrationError::InvalidConfig { .. })
        ));
    }

    // ========================================
    // Fitting
    // ========================================

    #[test]
    fn test_recovers_generating_parameters() {
        let fit = SabrSmileFitter::default().fit(&smile_from(&truth())).unwrap();
        assert_relative_eq!(fit.parameters.alpha(), 0.05, epsilon = 1e-6);
        assert_eq!(fit.parameters.beta(), 0.5);
        assert_relative_eq!(fit.parameters.rho(), -0.25, epsilon = 1e-6);
        assert_relative_eq!(fit.parameters.nu(), 0.5, epsilon = 1e-6);
        assert!(fit.chi_squared < 1e-14);
        assert!(fit.rms_residual < 1e-7);
    }

    #[test]
    fn test_off_model_quote_leaves_residual() {
        let mut smile = smile_from(&truth());
        smile.volatilities[5] += 0.002;
        let fit = SabrSmileFitter::default().fit(&smile).unwrap();
        assert!(fit.rms_residual > 1e-5);
        assert_relative_eq!(
            fit.rms_residual * fit.rms_residual * smile.len() as f64,
            fit.chi_squared,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_free_beta_recovers_fit() {
        let config = SabrFitConfig::default()
            .with_fixed(SabrParameter::Beta, false)
            .with_lm(LMConfig::new(1e-10, 500));
        let fit = SabrSmileFitter::new(config).fit(&smile_from(&truth())).unwrap();
        let refit = smile_from(&fit.parameters);
        for (a, b) in refit.volatilities.iter().zip(&smile_from(&truth()).volatilities) {
            assert_relative_eq!(a, b, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_non_convergence_reported() {
        let config = SabrFitConfig::default().with_lm(LMConfig::new(1e-14, 1));
        let err = SabrSmileFitter::new(config).fit(&smile_from(&truth())).unwrap_err();
        assert!(matches!(err, CalibrationError::ConvergenceFailure { .. }));
        assert!(err.is_recoverable());
    }

    // ========================================
    // Inverse Jacobian
    // ========================================

    #[test]
    fn test_fixed_parameter_row_is_zero() {
        let fit = SabrSmileFitter::default().fit(&smile_from(&truth())).unwrap();
        assert!(fit.inverse_jacobian.row(1).iter().all(|&v| v == 0.0));
        assert!(fit.inverse_jacobian.row(0).iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_inverse_jacobian_matches_refit() {
        let fitter =
            SabrSmileFitter::new(SabrFitConfig::default().with_lm(LMConfig::new(1e-10, 500)));
        let smile = smile_from(&truth());
        let fit = fitter.fit(&smile).unwrap();
        let h = 1e-5;

        for col in [0, 3, 6] {
            let mut up = smile.clone();
            up.volatilities[col] += h;
            let mut down = smile.clone();
            down.volatilities[col] -= h;
            let p_up = fitter.fit(&up).unwrap().parameters.to_array();
            let p_down = fitter.fit(&down).unwrap().parameters.to_array();
            for row in [0, 2, 3] {
                let fd = (p_up[row] - p_down[row]) / (2.0 * h);
                assert_relative_eq!(
                    fit.inverse_jacobian[(row, col)],
                    fd,
                    epsilon = 1e-3,
                    max_relative = 1e-2
                );
            }
        }
    }

    #[test]
    fn test_observation_errors_scale_columns_only() {
        let smile = smile_from(&truth());
        let fit = SabrSmileFitter::default().fit(&smile).unwrap();
        let weighted = SabrSmileFitter::default()
            .fit(&smile.clone().with_errors(vec![2.0; 7]))
            .unwrap();
        // Uniform errors do not change the data sensitivity.
        for (a, b) in fit.inverse_jacobian.iter().zip(weighted.inverse_jacobian.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-6, max_relative = 1e-4);
        }
    }

    #[test]
    fn test_transforms_invert() {
        for (p, v) in [
            (SabrParameter::Alpha, 0.03),
            (SabrParameter::Beta, 0.7),
            (SabrParameter::Rho, -0.4),
            (SabrParameter::Nu, 0.9),
        ] {
            let (back, _) = from_unconstrained(p, to_unconstrained(p, v));
            assert_relative_eq!(back, v, epsilon = 1e-14);
        }
    }
}
