//! # pricer_core: Numerical Foundation for Rate Analytics
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the pricer stack, providing:
//! - Interpolators with node weights (`math::interpolators`)
//! - Newton and Levenberg-Marquardt solvers (`math::solvers`)
//! - Finite-difference Jacobians (`math::differentiation`)
//! - Yield curves, named curve sets, spot FX rates and parameter surfaces (`market_data`)
//! - Curve and SABR sensitivity containers (`sensitivities`)
//! - Currency codes (`types::currency`)
//! - Error taxonomy: `ErrorCategory`, `CurrencyError`, `InterpolationError`, `SolverError`
//!   (`types::error`)
//!
//! ## Minimal Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates:
//! - num-traits: Generic interpolators
//! - nalgebra: Dense matrices and linear solves
//! - thiserror: Error types
//! - tracing: Solver diagnostics
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{CurveInterpolation, InterpolatedCurve, YieldCurve};
//! use pricer_core::sensitivities::CurveSensitivity;
//!
//! let curve = InterpolatedCurve::new(
//!     &[1.0, 2.0, 5.0],
//!     &[0.02, 0.025, 0.03],
//!     CurveInterpolation::Linear,
//!     true,
//! )
//! .unwrap();
//! let df = curve.discount_factor(3.0).unwrap();
//! assert!(df > 0.9 && df < 1.0);
//!
//! // dV/dr(3) for a unit zero-coupon bond is -3 * DF(3)
//! let sens = CurveSensitivity::from_curve("USD-OIS", vec![(3.0, -3.0 * df)]);
//! assert!((sens.total() + 3.0 * df).abs() < 1e-15);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for configurations, curves and sensitivities

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod sensitivities;
pub mod types;
