//! Natural cubic spline interpolation.

use super::traits::{out_of_bounds, validate_nodes, Extrapolation, Interpolator};
use crate::types::InterpolationError;
use num_traits::Float;

/// Natural cubic spline interpolator with C² continuity.
///
/// Stored in second-derivative form: on segment `[x_i, x_{i+1}]` with
/// `A = (x_{i+1} - x) / h`, `B = 1 - A`,
///
/// ```text
/// y(x) = A y_i + B y_{i+1} + ((A³ - A) M_i + (B³ - B) M_{i+1}) h² / 6
/// ```
///
/// The second derivatives `M` depend linearly on the node values, so the
/// derivative matrix `dM/dy` is computed once at construction and reused
/// for node weights.
///
/// At least 3 data points are required.
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::{Interpolator, CubicSplineInterpolator};
///
/// let xs = [0.0_f64, 1.0, 2.0, 3.0];
/// let ys = [0.0, 1.0, 4.0, 9.0];
///
/// let interp = CubicSplineInterpolator::new(&xs, &ys).unwrap();
/// let y = interp.interpolate(1.5).unwrap();
/// let w = interp.node_weights(1.5).unwrap();
/// let weighted: f64 = w.iter().zip(&ys).map(|(w, y)| w * y).sum();
/// assert!((weighted - y).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CubicSplineInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
    /// Second derivatives at the nodes.
    m: Vec<T>,
    /// `dm_dy[j][i] = dM_i / dy_j`.
    dm_dy: Vec<Vec<T>>,
    extrapolation: Extrapolation,
}

impl<T: Float> CubicSplineInterpolator<T> {
    /// Construct a natural cubic spline from strictly increasing `xs`.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - Fewer than 3 data points
    /// * `NonMonotonicData` - `xs` not strictly increasing
    /// * `InvalidInput` - Mismatched array lengths
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_core::math::interpolators::CubicSplineInterpolator;
    ///
    /// let result = CubicSplineInterpolator::new(&[0.0, 1.0], &[0.0, 1.0]);
    /// assert!(result.is_err());
    /// ```
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_nodes(xs, ys, 3)?;
        let n = xs.len();
        let m = Self::second_derivatives(xs, ys);
        let dm_dy = (0..n)
            .map(|j| {
                let mut unit = vec![T::zero(); n];
                unit[j] = T::one();
                Self::second_derivatives(xs, &unit)
            })
            .collect();
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            m,
            dm_dy,
            extrapolation: Extrapolation::None,
        })
    }

    /// Set the extrapolation behaviour.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Solve the natural-spline tridiagonal system with the Thomas algorithm.
    ///
    /// Interior equations, `M_0 = M_{n-1} = 0`:
    ///
    /// ```text
    /// h_{i-1} M_{i-1} + 2 (h_{i-1} + h_i) M_i + h_i M_{i+1}
    ///     = 6 ((y_{i+1} - y_i) / h_i - (y_i - y_{i-1}) / h_{i-1})
    /// ```
    fn second_derivatives(xs: &[T], ys: &[T]) -> Vec<T> {
        let n = xs.len();
        let two = T::one() + T::one();
        let six = two * (two + T::one());
        let h: Vec<T> = xs.windows(2).map(|w| w[1] - w[0]).collect();

        let interior = n - 2;
        let mut diag = Vec::with_capacity(interior);
        let mut rhs = Vec::with_capacity(interior);
        for i in 1..n - 1 {
            diag.push(two * (h[i - 1] + h[i]));
            rhs.push(six * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]));
        }

        // Forward sweep: sub-diagonal of row k is h[k], super-diagonal h[k + 1].
        for k in 1..interior {
            let factor = h[k] / diag[k - 1];
            diag[k] = diag[k] - factor * h[k];
            rhs[k] = rhs[k] - factor * rhs[k - 1];
        }

        let mut m = vec![T::zero(); n];
        for k in (0..interior).rev() {
            let upper = if k + 1 < interior {
                h[k + 1] * m[k + 2]
            } else {
                T::zero()
            };
            m[k + 1] = (rhs[k] - upper) / diag[k];
        }
        m
    }

    /// Segment index and the `A`, `B` basis coordinates, or an end node
    /// under flat extrapolation.
    fn locate(&self, x: T) -> Result<Location<T>, InterpolationError> {
        let (min, max) = self.domain();
        if x < min || x > max {
            return match self.extrapolation {
                Extrapolation::None => Err(out_of_bounds(x, min, max)),
                Extrapolation::Flat if x < min => Ok(Location::Node(0)),
                Extrapolation::Flat => Ok(Location::Node(self.xs.len() - 1)),
            };
        }
        let pos = self.xs.partition_point(|&xi| xi <= x);
        let i = pos.clamp(1, self.xs.len() - 1) - 1;
        let h = self.xs[i + 1] - self.xs[i];
        let a = (self.xs[i + 1] - x) / h;
        Ok(Location::Segment { i, a, b: T::one() - a, h })
    }

    /// Curvature coefficients `(A³ - A) h² / 6` and `(B³ - B) h² / 6`.
    #[inline]
    fn curvature(a: T, b: T, h: T) -> (T, T) {
        let two = T::one() + T::one();
        let scale = h * h / (two * (two + T::one()));
        ((a * a * a - a) * scale, (b * b * b - b) * scale)
    }
}

enum Location<T> {
    Node(usize),
    Segment { i: usize, a: T, b: T, h: T },
}

impl<T: Float> Interpolator<T> for CubicSplineInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        Ok(match self.locate(x)? {
            Location::Node(i) => self.ys[i],
            Location::Segment { i, a, b, h } => {
                let (ca, cb) = Self::curvature(a, b, h);
                a * self.ys[i] + b * self.ys[i + 1] + ca * self.m[i] + cb * self.m[i + 1]
            }
        })
    }

    fn node_weights(&self, x: T) -> Result<Vec<T>, InterpolationError> {
        let n = self.xs.len();
        Ok(match self.locate(x)? {
            Location::Node(i) => {
                let mut weights = vec![T::zero(); n];
                weights[i] = T::one();
                weights
            }
            Location::Segment { i, a, b, h } => {
                let (ca, cb) = Self::curvature(a, b, h);
                let mut weights: Vec<T> = self
                    .dm_dy
                    .iter()
                    .map(|dm| ca * dm[i] + cb * dm[i + 1])
                    .collect();
                weights[i] = weights[i] + a;
                weights[i + 1] = weights[i + 1] + b;
                weights
            }
        })
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}
