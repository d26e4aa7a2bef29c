//! SABR parameter surfaces over an (expiry, tenor) grid.
//!
//! Each grid point carries its own smile. Points are fitted independently
//! (concurrently with the `parallel` feature), then the four fitted
//! parameters are laid out as four bilinear surfaces with flat
//! extrapolation. The per-point inverse Jacobian of every fit is kept for
//! converting parameter risk into Black volatility risk.

use super::error::SurfaceCalibrationError;
use nalgebra::DMatrix;
use pricer_core::market_data::surfaces::{GridPoint, InterpolatedSurface};
use pricer_core::sensitivities::SabrParameter;
use pricer_models::calibration::{SabrFitConfig, SabrFitResult, SabrSmile, SabrSmileFitter};
use pricer_models::models::SabrParameters;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calibrated SABR surfaces and the fit Jacobians behind them.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use pricer_core::market_data::surfaces::InterpolatedSurface;
/// use pricer_core::sensitivities::SabrParameter;
/// use pricer_optimiser::calibration::SabrSurfaceParameters;
///
/// let flat = |v: f64| InterpolatedSurface::new(&[1.0, 5.0], &[2.0, 10.0], &[vec![v, v], vec![v, v]]).unwrap();
/// let surfaces = SabrSurfaceParameters::new(flat(0.03), flat(0.5), flat(-0.2), flat(0.4), BTreeMap::new());
///
/// let params = surfaces.parameters_at(3.0, 4.0).unwrap();
/// assert!((params.rho() + 0.2).abs() < 1e-15);
/// assert_eq!(surfaces.surface(SabrParameter::Nu).value(20.0, 1.0).unwrap(), 0.4);
/// ```
#[derive(Debug, Clone)]
pub struct SabrSurfaceParameters {
    alpha: InterpolatedSurface,
    beta: InterpolatedSurface,
    rho: InterpolatedSurface,
    nu: InterpolatedSurface,
    inverse_jacobians: BTreeMap<GridPoint, DMatrix<f64>>,
}

impl SabrSurfaceParameters {
    /// Assemble from four surfaces and the per-point inverse Jacobians.
    pub fn new(
        alpha: InterpolatedSurface,
        beta: InterpolatedSurface,
        rho: InterpolatedSurface,
        nu: InterpolatedSurface,
        inverse_jacobians: BTreeMap<GridPoint, DMatrix<f64>>,
    ) -> Self {
        Self {
            alpha,
            beta,
            rho,
            nu,
            inverse_jacobians,
        }
    }

    /// Surface of one parameter.
    pub fn surface(&self, parameter: SabrParameter) -> &InterpolatedSurface {
        match parameter {
            SabrParameter::Alpha => &self.alpha,
            SabrParameter::Beta => &self.beta,
            SabrParameter::Rho => &self.rho,
            SabrParameter::Nu => &self.nu,
        }
    }

    /// Interpolated parameters at `(expiry, tenor)`.
    ///
    /// # Errors
    ///
    /// `Model` if the interpolated values leave the SABR domain.
    pub fn parameters_at(
        &self,
        expiry: f64,
        tenor: f64,
    ) -> Result<SabrParameters, SurfaceCalibrationError> {
        Ok(SabrParameters::new(
            self.alpha.value(expiry, tenor)?,
            self.beta.value(expiry, tenor)?,
            self.rho.value(expiry, tenor)?,
            self.nu.value(expiry, tenor)?,
        )?)
    }

    /// Hagan implied Black volatility at `(expiry, tenor)`.
    pub fn volatility(
        &self,
        expiry: f64,
        tenor: f64,
        forward: f64,
        strike: f64,
    ) -> Result<f64, SurfaceCalibrationError> {
        Ok(self.parameters_at(expiry, tenor)?.volatility(forward, strike, expiry)?)
    }

    /// `d(alpha, beta, rho, nu) / d vol_k` of the fit at `point`.
    pub fn inverse_jacobian(&self, point: &GridPoint) -> Option<&DMatrix<f64>> {
        self.inverse_jacobians.get(point)
    }

    /// All stored inverse Jacobians.
    #[inline]
    pub fn inverse_jacobians(&self) -> &BTreeMap<GridPoint, DMatrix<f64>> {
        &self.inverse_jacobians
    }

    /// Grid nodes of the surfaces, in `(expiry, tenor)` order.
    pub fn grid_points(&self) -> Vec<GridPoint> {
        self.alpha
            .expiries()
            .iter()
            .flat_map(|&e| self.alpha.tenors().iter().map(move |&t| GridPoint::new(e, t)))
            .collect()
    }

    /// Copy with one node of one surface moved by `amount`.
    ///
    /// # Errors
    ///
    /// `UnknownPoint` if `point` is not a node of that surface.
    pub fn with_node_bump(
        &self,
        parameter: SabrParameter,
        point: GridPoint,
        amount: f64,
    ) -> Result<Self, SurfaceCalibrationError> {
        let surface = self.surface(parameter);
        let i = surface.expiries().iter().position(|&e| e == point.expiry);
        let j = surface.tenors().iter().position(|&t| t == point.tenor);
        let (Some(i), Some(j)) = (i, j) else {
            return Err(SurfaceCalibrationError::UnknownPoint { point });
        };

        let mut values = surface.values().to_vec();
        values[i][j] += amount;
        let bumped = InterpolatedSurface::new(surface.expiries(), surface.tenors(), &values)?;

        let mut result = self.clone();
        match parameter {
            SabrParameter::Alpha => result.alpha = bumped,
            SabrParameter::Beta => result.beta = bumped,
            SabrParameter::Rho => result.rho = bumped,
            SabrParameter::Nu => result.nu = bumped,
        }
        Ok(result)
    }
}

/// Fits a smile at every grid point and builds the parameter surfaces.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::surfaces::GridPoint;
/// use pricer_models::calibration::{SabrFitConfig, SabrSmile};
/// use pricer_models::models::SabrParameters;
/// use pricer_optimiser::calibration::SabrSurfaceCalibrator;
///
/// let truth = SabrParameters::new(0.04, 0.5, -0.3, 0.4).unwrap();
/// let offsets = [-0.01, -0.005, 0.0, 0.005, 0.01];
/// let smiles: Vec<_> = [(1.0, 2.0), (1.0, 10.0), (5.0, 2.0), (5.0, 10.0)]
///     .iter()
///     .map(|&(expiry, tenor)| {
///         let vols = offsets
///             .iter()
///             .map(|o| truth.volatility(0.03, 0.03 + o, expiry).unwrap())
///             .collect();
///         (GridPoint::new(expiry, tenor), SabrSmile::from_offsets(0.03, expiry, &offsets, vols))
///     })
///     .collect();
///
/// let surfaces = SabrSurfaceCalibrator::new(SabrFitConfig::default()).calibrate(&smiles).unwrap();
/// let fitted = surfaces.parameters_at(3.0, 6.0).unwrap();
/// assert!((fitted.nu() - 0.4).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SabrSurfaceCalibrator {
    fitter: SabrSmileFitter,
}

impl SabrSurfaceCalibrator {
    /// Calibrator fitting every point with `config`.
    pub fn new(config: SabrFitConfig) -> Self {
        Self {
            fitter: SabrSmileFitter::new(config),
        }
    }

    /// Fit settings shared by every point.
    #[inline]
    pub fn config(&self) -> &SabrFitConfig {
        self.fitter.config()
    }

    /// Fit every smile and assemble the surfaces.
    ///
    /// The points must form a complete rectangular grid with at least two
    /// expiries and two tenors.
    ///
    /// # Errors
    ///
    /// * `DuplicatePoint` - A grid point appears twice
    /// * `IncompleteGrid` - Some (expiry, tenor) combination is missing
    /// * `PointFailure` - A smile fit failed; carries the grid point
    /// * `MarketData` - Fewer than two expiries or tenors
    pub fn calibrate(
        &self,
        smiles: &[(GridPoint, SabrSmile)],
    ) -> Result<SabrSurfaceParameters, SurfaceCalibrationError> {
        let mut points = BTreeSet::new();
        for (point, _) in smiles {
            if !points.insert(*point) {
                return Err(SurfaceCalibrationError::DuplicatePoint { point: *point });
            }
        }

        let mut expiries: Vec<f64> = points.iter().map(|p| p.expiry).collect();
        expiries.dedup();
        let mut tenors: Vec<f64> = points.iter().map(|p| p.tenor).collect();
        tenors.sort_by(f64::total_cmp);
        tenors.dedup();
        if points.len() != expiries.len() * tenors.len() {
            return Err(SurfaceCalibrationError::IncompleteGrid {
                expiries: expiries.len(),
                tenors: tenors.len(),
                points: points.len(),
            });
        }

        let fits = self.fit_all(smiles)?;

        let mut grids = [(); 4].map(|_| vec![vec![0.0; tenors.len()]; expiries.len()]);
        let mut inverse_jacobians = BTreeMap::new();
        for (point, fit) in fits {
            let i = expiries.partition_point(|&e| e < point.expiry);
            let j = tenors.partition_point(|&t| t < point.tenor);
            for (grid, value) in grids.iter_mut().zip(fit.parameters.to_array()) {
                grid[i][j] = value;
            }
            inverse_jacobians.insert(point, fit.inverse_jacobian);
        }

        let [alpha, beta, rho, nu] = grids;
        debug!(
            expiries = expiries.len(),
            tenors = tenors.len(),
            "sabr surface calibrated"
        );
        Ok(SabrSurfaceParameters::new(
            InterpolatedSurface::new(&expiries, &tenors, &alpha)?,
            InterpolatedSurface::new(&expiries, &tenors, &beta)?,
            InterpolatedSurface::new(&expiries, &tenors, &rho)?,
            InterpolatedSurface::new(&expiries, &tenors, &nu)?,
            inverse_jacobians,
        ))
    }

    fn fit_all(
        &self,
        smiles: &[(GridPoint, SabrSmile)],
    ) -> Result<Vec<(GridPoint, SabrFitResult)>, SurfaceCalibrationError> {
        let fit_one = |(point, smile): &(GridPoint, SabrSmile)| self.fit_point(*point, smile);

        #[cfg(feature = "parallel")]
        {
            smiles.par_iter().map(fit_one).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            smiles.iter().map(fit_one).collect()
        }
    }

    fn fit_point(
        &self,
        point: GridPoint,
        smile: &SabrSmile,
    ) -> Result<(GridPoint, SabrFitResult), SurfaceCalibrationError> {
        let fit = self
            .fitter
            .fit(smile)
            .map_err(|source| SurfaceCalibrationError::PointFailure { point, source })?;
        debug!(
            expiry = point.expiry,
            tenor = point.tenor,
            iterations = fit.iterations,
            chi_squared = fit.chi_squared,
            "grid point fitted"
        );
        Ok((point, fit))
    }
}
