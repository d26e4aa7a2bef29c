//! Interpolator trait shared by the 1-D interpolators.

use crate::types::InterpolationError;
use num_traits::Float;

/// Behaviour outside the node range.
///
/// # Variants
/// - `None`: Queries outside `[x_min, x_max]` fail with `OutOfBounds`
/// - `Flat`: The end value is held constant beyond each end node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    /// No extrapolation; out-of-range queries are errors.
    #[default]
    None,
    /// Flat extrapolation from the nearest end node.
    Flat,
}

/// One-dimensional interpolation over a fixed set of nodes.
///
/// Every implementation is linear in the node values, so the interpolated
/// value is a weighted sum of the node values. [`node_weights`] exposes
/// those weights; they are what turns a sensitivity to the interpolated
/// value into sensitivities to the individual nodes.
///
/// # Contract
///
/// For every `x` in range:
///
/// ```text
/// interpolate(x) == sum_i node_weights(x)[i] * y[i]
/// ```
///
/// [`node_weights`]: Interpolator::node_weights
pub trait Interpolator<T: Float> {
    /// Interpolated value at `x`.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Sensitivity of the interpolated value at `x` to each node value.
    ///
    /// The returned vector has one entry per node, in node order.
    fn node_weights(&self, x: T) -> Result<Vec<T>, InterpolationError>;

    /// Valid interpolation range `(x_min, x_max)`.
    fn domain(&self) -> (T, T);
}

/// Validate abscissae: matching lengths, enough points, strictly increasing.
pub(crate) fn validate_nodes<T: Float>(
    xs: &[T],
    ys: &[T],
    need: usize,
) -> Result<(), InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "xs and ys must have same length: got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < need {
        return Err(InterpolationError::InsufficientData {
            got: xs.len(),
            need,
        });
    }
    if let Some(index) = xs.iter().position(|x| !x.is_finite()) {
        return Err(InterpolationError::InvalidInput(format!(
            "non-finite abscissa at index {}",
            index
        )));
    }
    match xs.windows(2).position(|w| w[1] <= w[0]) {
        Some(i) => Err(InterpolationError::NonMonotonicData { index: i + 1 }),
        None => Ok(()),
    }
}

/// Out-of-bounds error for a query point.
pub(crate) fn out_of_bounds<T: Float>(x: T, min: T, max: T) -> InterpolationError {
    InterpolationError::OutOfBounds {
        x: x.to_f64().unwrap_or(f64::NAN),
        min: min.to_f64().unwrap_or(f64::NAN),
        max: max.to_f64().unwrap_or(f64::NAN),
    }
}
