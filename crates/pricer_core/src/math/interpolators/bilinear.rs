//! Bilinear 2D interpolation for surfaces.

use super::traits::{out_of_bounds, Extrapolation};
use crate::types::InterpolationError;
use num_traits::Float;

/// Bilinear interpolator on a rectangular grid.
///
/// Values are stored as `zs[x_idx][y_idx]`. Within a cell the value is
///
/// ```text
/// z = (1-u)(1-v) z00 + u(1-v) z10 + (1-u)v z01 + uv z11
/// ```
///
/// With [`Extrapolation::Flat`] each coordinate is clamped to its axis range
/// before interpolation, which is linear-in-each-dimension with flat
/// extrapolation.
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::{BilinearInterpolator, Extrapolation};
///
/// let xs = [0.0_f64, 1.0];
/// let ys = [0.0, 1.0];
/// let zs = [&[0.0, 1.0][..], &[2.0, 3.0][..]];
///
/// let interp = BilinearInterpolator::new(&xs, &ys, &zs)
///     .unwrap()
///     .with_extrapolation(Extrapolation::Flat);
/// assert!((interp.interpolate(0.5, 0.5).unwrap() - 1.5).abs() < 1e-12);
/// assert_eq!(interp.node_weights(0.0, 5.0).unwrap(), vec![((0, 1), 1.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct BilinearInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
    zs: Vec<Vec<T>>,
    extrapolation: Extrapolation,
}

impl<T: Float> BilinearInterpolator<T> {
    /// Construct from strictly increasing axes and a `xs.len() x ys.len()` grid.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - Fewer than 2 points on an axis
    /// * `NonMonotonicData` - An axis not strictly increasing
    /// * `InvalidInput` - Grid dimensions mismatch
    pub fn new(xs: &[T], ys: &[T], zs: &[&[T]]) -> Result<Self, InterpolationError> {
        Self::validate_axis(xs)?;
        Self::validate_axis(ys)?;

        if zs.len() != xs.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "Grid rows ({}) must match x-axis length ({})",
                zs.len(),
                xs.len()
            )));
        }
        for (i, row) in zs.iter().enumerate() {
            if row.len() != ys.len() {
                return Err(InterpolationError::InvalidInput(format!(
                    "Grid row {} length ({}) must match y-axis length ({})",
                    i,
                    row.len(),
                    ys.len()
                )));
            }
        }

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            zs: zs.iter().map(|row| row.to_vec()).collect(),
            extrapolation: Extrapolation::None,
        })
    }

    fn validate_axis(axis: &[T]) -> Result<(), InterpolationError> {
        if axis.len() < 2 {
            return Err(InterpolationError::InsufficientData {
                got: axis.len(),
                need: 2,
            });
        }
        match axis.windows(2).position(|w| w[1] <= w[0]) {
            Some(i) => Err(InterpolationError::NonMonotonicData { index: i + 1 }),
            None => Ok(()),
        }
    }

    /// Set the extrapolation behaviour.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Interpolated value at `(x, y)`.
    pub fn interpolate(&self, x: T, y: T) -> Result<T, InterpolationError> {
        let cell = self.locate(x, y)?;
        Ok(cell
            .corners()
            .iter()
            .map(|&((i, j), w)| w * self.zs[i][j])
            .fold(T::zero(), |acc, z| acc + z))
    }

    /// Non-zero node weights at `(x, y)` as `((x_idx, y_idx), weight)`.
    ///
    /// An interior point has four entries; points on a grid line or in the
    /// flat-extrapolation region have two, a point on a node has one.
    pub fn node_weights(&self, x: T, y: T) -> Result<Vec<((usize, usize), T)>, InterpolationError> {
        let cell = self.locate(x, y)?;
        Ok(cell
            .corners()
            .into_iter()
            .filter(|(_, w)| *w != T::zero())
            .collect())
    }

    fn locate(&self, x: T, y: T) -> Result<Cell<T>, InterpolationError> {
        let (i, u) = Self::locate_axis(&self.xs, x, self.extrapolation)?;
        let (j, v) = Self::locate_axis(&self.ys, y, self.extrapolation)?;
        Ok(Cell { i, j, u, v })
    }

    fn locate_axis(
        axis: &[T],
        x: T,
        extrapolation: Extrapolation,
    ) -> Result<(usize, T), InterpolationError> {
        let (min, max) = (axis[0], axis[axis.len() - 1]);
        let x = if x < min || x > max {
            match extrapolation {
                Extrapolation::None => return Err(out_of_bounds(x, min, max)),
                Extrapolation::Flat => x.max(min).min(max),
            }
        } else {
            x
        };
        let pos = axis.partition_point(|&a| a <= x);
        let i = pos.clamp(1, axis.len() - 1) - 1;
        Ok((i, (x - axis[i]) / (axis[i + 1] - axis[i])))
    }

    /// Domain along the first axis.
    #[inline]
    pub fn domain_x(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Domain along the second axis.
    #[inline]
    pub fn domain_y(&self) -> (T, T) {
        (self.ys[0], self.ys[self.ys.len() - 1])
    }

    /// First-axis nodes.
    #[inline]
    pub fn xs(&self) -> &[T] {
        &self.xs
    }

    /// Second-axis nodes.
    #[inline]
    pub fn ys(&self) -> &[T] {
        &self.ys
    }

    /// Grid values, `zs[x_idx][y_idx]`.
    #[inline]
    pub fn zs(&self) -> &[Vec<T>] {
        &self.zs
    }
}

struct Cell<T> {
    i: usize,
    j: usize,
    u: T,
    v: T,
}

impl<T: Float> Cell<T> {
    fn corners(&self) -> [((usize, usize), T); 4] {
        let one = T::one();
        let (i, j, u, v) = (self.i, self.j, self.u, self.v);
        [
            ((i, j), (one - u) * (one - v)),
            ((i + 1, j), u * (one - v)),
            ((i, j + 1), (one - u) * v),
            ((i + 1, j + 1), u * v),
        ]
    }
}
