//! Sensitivity containers.
//!
//! - [`CurveSensitivity`]: `dV/dr(t)` point sensitivities per named curve
//! - [`SabrSensitivity`]: `dV/dparameter` per SABR parameter and grid point
//!
//! Both are values: combining operations return new containers.

mod curve;
mod error;
mod sabr;

pub use curve::{CleanTolerance, CurveSensitivity};
pub use error::SensitivityError;
pub use sabr::{SabrParameter, SabrSensitivity};
