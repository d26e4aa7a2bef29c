//! Yield curve abstractions.
//!
//! This module provides:
//! - [`YieldCurve`]: Zero rates, discount factors and parameter sensitivities
//! - [`FlatCurve`]: Constant rate yield curve implementation
//! - [`InterpolatedCurve`]: Node-based interpolated zero-rate curve
//! - [`CurveInterpolation`]: Interpolation method selection
//! - [`CurveEnum`]: Static dispatch enum wrapping concrete curve implementations
//! - [`CurveSet`]: Container for managing multiple named yield curves
//! - [`CurveBundle`]: Known and solved curve sets with disjoint names
//! - [`CurveProvider`]: Name-based curve lookup used by pricing code

mod curve_enum;
mod curve_set;
mod flat;
mod interpolated;
mod traits;

pub use curve_enum::CurveEnum;
pub use curve_set::{CurveBundle, CurveProvider, CurveSet};
pub use flat::FlatCurve;
pub use interpolated::{CurveInterpolation, InterpolatedCurve};
pub use traits::YieldCurve;
