//! # pricer_optimiser
//!
//! Calibration of curve bundles and SABR surfaces.
//!
//! This crate sits between Models (L2) and Risk (L4) in the architecture,
//! solving inverse problems to construct calibrated market objects.
//!
//! ## Architecture Position
//!
//! Layer 2.5 in the **P**ricer layer.
//! Depends on `pricer_core` (L1) and `pricer_models` (L2).
//!
//! ## Modules
//!
//! - `bootstrapping`: Simultaneous multi-curve root finding against par rates
//!   or present values, with analytic `J = W · S` Jacobians
//! - `calibration`: Grid-wide SABR smile fitting assembled into
//!   interpolated parameter surfaces
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::curves::{CurveInterpolation, CurveSet};
//! use pricer_models::calculators::ParRateCalculator;
//! use pricer_models::instruments::{Cash, RateInstrument};
//! use pricer_optimiser::bootstrapping::{CalibrationNodeSet, MultiCurveFinder, MultiCurveProblem};
//!
//! let times = [0.5, 1.0, 2.0];
//! let deposits: Vec<RateInstrument> = times
//!     .iter()
//!     .map(|&t| Cash::new("USD-OIS", 0.0, t, 0.03).unwrap().into())
//!     .collect();
//!
//! let nodes = CalibrationNodeSet::new()
//!     .with_curve("USD-OIS", times.to_vec(), CurveInterpolation::Linear)
//!     .unwrap();
//! let problem = MultiCurveProblem::at_quotes(deposits, nodes, CurveSet::new()).unwrap();
//! let solution = MultiCurveFinder::new(problem, ParRateCalculator).solve().unwrap();
//! assert!(solution.residual_norm < 1e-10);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod bootstrapping;
pub mod calibration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bootstrapping::*;
    pub use crate::calibration::*;
}
