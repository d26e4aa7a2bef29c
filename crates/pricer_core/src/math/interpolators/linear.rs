//! Piecewise linear interpolation.

use super::traits::{out_of_bounds, validate_nodes, Extrapolation, Interpolator};
use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolator.
///
/// Stores strictly increasing x-coordinates with their y-values and
/// interpolates linearly between adjacent nodes. Node weights are the two
/// hat-function values of the bracketing segment, so at most two entries
/// of [`Interpolator::node_weights`] are non-zero.
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::{Extrapolation, Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[0.0_f64, 1.0, 2.0], &[0.0, 10.0, 40.0])
///     .unwrap()
///     .with_extrapolation(Extrapolation::Flat);
///
/// assert!((interp.interpolate(0.5).unwrap() - 5.0).abs() < 1e-12);
/// assert_eq!(interp.node_weights(0.25).unwrap(), vec![0.75, 0.25, 0.0]);
/// assert_eq!(interp.interpolate(3.0).unwrap(), 40.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
    extrapolation: Extrapolation,
}

impl<T: Float> LinearInterpolator<T> {
    /// Construct from strictly increasing `xs` and matching `ys`.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - Fewer than 2 points
    /// * `NonMonotonicData` - `xs` not strictly increasing
    /// * `InvalidInput` - Mismatched lengths or non-finite abscissae
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_nodes(xs, ys, 2)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            extrapolation: Extrapolation::None,
        })
    }

    /// Set the extrapolation behaviour.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Node abscissae.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Node values.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Index `i` of the segment `[x_i, x_{i+1}]` containing `x`.
    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        pos.clamp(1, self.xs.len() - 1) - 1
    }

    /// Segment index and fractional position of an in-range point, or the
    /// end node index when flat extrapolation applies.
    fn locate(&self, x: T) -> Result<Location<T>, InterpolationError> {
        let (min, max) = self.domain();
        if x < min || x > max {
            return match self.extrapolation {
                Extrapolation::None => Err(out_of_bounds(x, min, max)),
                Extrapolation::Flat if x < min => Ok(Location::Node(0)),
                Extrapolation::Flat => Ok(Location::Node(self.xs.len() - 1)),
            };
        }
        let i = self.find_segment(x);
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(Location::Segment(i, w))
    }
}

enum Location<T> {
    Node(usize),
    Segment(usize, T),
}

impl<T: Float> Interpolator<T> for LinearInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        Ok(match self.locate(x)? {
            Location::Node(i) => self.ys[i],
            Location::Segment(i, w) => self.ys[i] + w * (self.ys[i + 1] - self.ys[i]),
        })
    }

    fn node_weights(&self, x: T) -> Result<Vec<T>, InterpolationError> {
        let mut weights = vec![T::zero(); self.xs.len()];
        match self.locate(x)? {
            Location::Node(i) => weights[i] = T::one(),
            Location::Segment(i, w) => {
                weights[i] = T::one() - w;
                weights[i + 1] = w;
            }
        }
        Ok(weights)
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
