//! Two-dimensional parameter surfaces.
//!
//! - [`InterpolatedSurface`]: Bilinear surface over `(expiry, tenor)` with
//!   flat extrapolation and node weights
//! - [`GridPoint`]: Ordered `(expiry, tenor)` key

mod grid_point;
mod interpolated;

pub use grid_point::GridPoint;
pub use interpolated::InterpolatedSurface;
