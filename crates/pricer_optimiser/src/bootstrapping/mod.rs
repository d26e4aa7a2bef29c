//! Multi-curve calibration.
//!
//! Curves are calibrated together rather than one pillar at a time: every
//! node of every solved curve is an unknown of one Newton system, so
//! instruments depending on several curves (FRAs and swaps discounted on
//! one curve and projected on another) are handled without ordering
//! constraints.
//!
//! ## Architecture
//!
//! - `CalibrationNodeSet`: Which curves are solved and where their nodes sit
//! - `MultiCurveProblem`: Instruments, targets and known curves, validated
//! - `MultiCurveFinder<C>`: Residuals, Jacobian and Newton solve
//! - `MultiCurveSolution`: Calibrated bundle plus the Jacobian and its
//!   inverse, used downstream for quote risk

mod config;
mod error;
mod multi_curve;
mod nodes;
mod problem;

pub use config::{JacobianMode, MultiCurveConfig};
pub use error::BootstrapError;
pub use multi_curve::{solve_all, MultiCurveFinder, MultiCurveSolution};
pub use nodes::{CalibrationNodeSet, CurveNodes};
pub use problem::MultiCurveProblem;
