//! Market data structures for rate analytics.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations, named curve sets
//! - [`surfaces`]: Interpolated parameter surfaces over (expiry, tenor)
//! - [`fx`]: Spot FX rates between currencies (FxMatrix)
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
//!
//! // Create a flat yield curve with 5% rate
//! let curve = FlatCurve::new(0.05);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod error;
pub mod fx;
pub mod surfaces;

pub use curves::{
    CurveBundle, CurveEnum, CurveInterpolation, CurveProvider, CurveSet, FlatCurve,
    InterpolatedCurve, YieldCurve,
};
pub use error::MarketDataError;
pub use fx::FxMatrix;
pub use surfaces::{GridPoint, InterpolatedSurface};
