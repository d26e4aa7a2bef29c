//! Parameter surface interpolated on an (expiry, tenor) grid.

use super::GridPoint;
use crate::market_data::error::MarketDataError;
use crate::math::interpolators::{BilinearInterpolator, Extrapolation};

/// Surface of one model parameter over `(expiry, tenor)`.
///
/// Linear in each dimension with flat extrapolation. Node weights are
/// reported against the node coordinates, so sensitivities computed at any
/// `(expiry, tenor)` can be pushed onto the grid points they came from.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::surfaces::{GridPoint, InterpolatedSurface};
///
/// let surface = InterpolatedSurface::new(
///     &[1.0, 5.0],
///     &[2.0, 10.0],
///     &[vec![0.04, 0.05], vec![0.06, 0.07]],
/// )
/// .unwrap();
///
/// assert!((surface.value(3.0, 6.0).unwrap() - 0.055).abs() < 1e-14);
/// // Beyond the grid: flat extrapolation onto the corner node
/// assert_eq!(surface.node_weights(10.0, 20.0).unwrap(), vec![(GridPoint::new(5.0, 10.0), 1.0)]);
/// ```
#[derive(Debug, Clone)]
pub struct InterpolatedSurface {
    interpolator: BilinearInterpolator<f64>,
}

impl InterpolatedSurface {
    /// Build a surface from grid axes and `values[expiry_idx][tenor_idx]`.
    ///
    /// # Errors
    ///
    /// `Interpolation` if an axis has fewer than 2 points, is not strictly
    /// increasing, or the grid shape does not match the axes.
    pub fn new(
        expiries: &[f64],
        tenors: &[f64],
        values: &[Vec<f64>],
    ) -> Result<Self, MarketDataError> {
        let rows: Vec<&[f64]> = values.iter().map(Vec::as_slice).collect();
        let interpolator = BilinearInterpolator::new(expiries, tenors, &rows)?
            .with_extrapolation(Extrapolation::Flat);
        Ok(Self { interpolator })
    }

    /// Interpolated value at `(expiry, tenor)`.
    pub fn value(&self, expiry: f64, tenor: f64) -> Result<f64, MarketDataError> {
        Ok(self.interpolator.interpolate(expiry, tenor)?)
    }

    /// Non-zero weights of the grid nodes at `(expiry, tenor)`.
    pub fn node_weights(
        &self,
        expiry: f64,
        tenor: f64,
    ) -> Result<Vec<(GridPoint, f64)>, MarketDataError> {
        let expiries = self.interpolator.xs();
        let tenors = self.interpolator.ys();
        Ok(self
            .interpolator
            .node_weights(expiry, tenor)?
            .into_iter()
            .map(|((i, j), w)| (GridPoint::new(expiries[i], tenors[j]), w))
            .collect())
    }

    /// Expiry axis.
    #[inline]
    pub fn expiries(&self) -> &[f64] {
        self.interpolator.xs()
    }

    /// Tenor axis.
    #[inline]
    pub fn tenors(&self) -> &[f64] {
        self.interpolator.ys()
    }

    /// Grid values, `values()[expiry_idx][tenor_idx]`.
    #[inline]
    pub fn values(&self) -> &[Vec<f64>] {
        self.interpolator.zs()
    }
}
