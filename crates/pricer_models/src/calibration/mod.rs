//! Model calibration module.
//!
//! - [`SabrSmileFitter`]: Least-squares SABR fit to one Black smile, with
//!   the sensitivity of the fitted parameters to the quotes
//! - [`SabrSmile`]: Forward, expiry and strike/volatility quotes
//! - [`SabrFitConfig`]: Initial guess, fixed-parameter mask, LM settings
//! - [`CalibrationError`]: Error types for calibration
//!
//! # Architecture
//!
//! ```text
//! SabrSmile ──► SabrSmileFitter ──► SabrFitResult
//!                    │                 ├─ parameters
//!                    ▼                 └─ inverse_jacobian (4 x n)
//!          LevenbergMarquardtSolver
//! ```

mod error;
pub mod sabr;

pub use error::CalibrationError;
pub use sabr::{
    SabrFitConfig, SabrFitResult, SabrSmile, SabrSmileFitter, DEFAULT_MIN_STRIKES, DEFAULT_WARN_RMS,
};
