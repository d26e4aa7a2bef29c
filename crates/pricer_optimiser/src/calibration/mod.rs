//! SABR surface calibration.
//!
//! Smiles observed on an (expiry, tenor) grid are fitted point by point
//! with [`SabrSmileFitter`](pricer_models::calibration::SabrSmileFitter)
//! and assembled into interpolated parameter surfaces.

mod error;
mod sabr_surface;

pub use error::SurfaceCalibrationError;
pub use sabr_surface::{SabrSurfaceCalibrator, SabrSurfaceParameters};
