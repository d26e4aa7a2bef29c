//! Interpolation methods with node-weight support.
//!
//! Every interpolator here is linear in its node values. Besides the
//! interpolated value each one reports the weight of every node at a query
//! point, which is how sensitivities to an interpolated quantity are pushed
//! back onto the underlying nodes.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: Piecewise linear interpolation between data points
//! - [`CubicSplineInterpolator`]: Natural cubic spline with C² continuity
//! - [`BilinearInterpolator`]: 2D grid interpolation for surfaces
//!
//! ## Core Trait
//!
//! 1D interpolators implement the [`Interpolator`] trait:
//! - `interpolate(x: T) -> Result<T, InterpolationError>`: Interpolated value
//! - `node_weights(x: T) -> Result<Vec<T>, InterpolationError>`: Weight per node
//! - `domain() -> (T, T)`: Node range
//!
//! Behaviour outside the node range is selected with [`Extrapolation`].
//!
//! ## Example
//!
//! ```
//! use pricer_core::math::interpolators::{Interpolator, LinearInterpolator};
//!
//! let xs = [0.0_f64, 1.0, 2.0, 3.0];
//! let ys = [0.0, 1.0, 4.0, 9.0];
//!
//! let interp = LinearInterpolator::new(&xs, &ys).unwrap();
//! let (x_min, x_max) = interp.domain();
//! assert_eq!(x_min, 0.0);
//! assert_eq!(x_max, 3.0);
//!
//! // Interpolate at x = 1.5 (between y=1.0 and y=4.0)
//! let y = interp.interpolate(1.5).unwrap();
//! assert!((y - 2.5).abs() < 1e-10);
//! ```

mod bilinear;
mod cubic_spline;
mod linear;
mod traits;

pub use bilinear::BilinearInterpolator;
pub use cubic_spline::CubicSplineInterpolator;
pub use linear::LinearInterpolator;
pub use traits::{Extrapolation, Interpolator};
