//! Sensitivities to SABR parameters keyed by `(expiry, tenor)`.

use crate::market_data::surfaces::GridPoint;
use std::collections::BTreeMap;
use std::fmt;

/// One of the four SABR parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SabrParameter {
    /// Initial volatility level.
    Alpha,
    /// CEV exponent.
    Beta,
    /// Forward/volatility correlation.
    Rho,
    /// Volatility of volatility.
    Nu,
}

impl SabrParameter {
    /// All parameters in model order.
    pub const ALL: [SabrParameter; 4] = [
        SabrParameter::Alpha,
        SabrParameter::Beta,
        SabrParameter::Rho,
        SabrParameter::Nu,
    ];

    /// Position in model order `(alpha, beta, rho, nu)`.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            SabrParameter::Alpha => 0,
            SabrParameter::Beta => 1,
            SabrParameter::Rho => 2,
            SabrParameter::Nu => 3,
        }
    }
}

impl fmt::Display for SabrParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SabrParameter::Alpha => "alpha",
            SabrParameter::Beta => "beta",
            SabrParameter::Rho => "rho",
            SabrParameter::Nu => "nu",
        };
        f.write_str(name)
    }
}

/// Value sensitivities to SABR parameters.
///
/// Holds one map `GridPoint -> dV/dparameter` per parameter. Used both for
/// point sensitivities at trade coordinates and for node sensitivities at
/// surface grid points. Amounts at the same coordinate are summed.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::surfaces::GridPoint;
/// use pricer_core::sensitivities::{SabrParameter, SabrSensitivity};
///
/// let point = GridPoint::new(1.0, 5.0);
/// let mut s = SabrSensitivity::new();
/// s.add(SabrParameter::Alpha, point, 2.0);
/// s.add(SabrParameter::Alpha, point, 0.5);
///
/// assert_eq!(s.get(SabrParameter::Alpha, point), 2.5);
/// assert_eq!(s.multiplied_by(2.0).get(SabrParameter::Alpha, point), 5.0);
/// assert_eq!(s.get(SabrParameter::Nu, point), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SabrSensitivity {
    alpha: BTreeMap<GridPoint, f64>,
    beta: BTreeMap<GridPoint, f64>,
    rho: BTreeMap<GridPoint, f64>,
    nu: BTreeMap<GridPoint, f64>,
}

impl SabrSensitivity {
    /// Empty container.
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, parameter: SabrParameter) -> &BTreeMap<GridPoint, f64> {
        match parameter {
            SabrParameter::Alpha => &self.alpha,
            SabrParameter::Beta => &self.beta,
            SabrParameter::Rho => &self.rho,
            SabrParameter::Nu => &self.nu,
        }
    }

    fn map_mut(&mut self, parameter: SabrParameter) -> &mut BTreeMap<GridPoint, f64> {
        match parameter {
            SabrParameter::Alpha => &mut self.alpha,
            SabrParameter::Beta => &mut self.beta,
            SabrParameter::Rho => &mut self.rho,
            SabrParameter::Nu => &mut self.nu,
        }
    }

    /// Accumulate `amount` at `point`.
    pub fn add(&mut self, parameter: SabrParameter, point: GridPoint, amount: f64) {
        *self.map_mut(parameter).entry(point).or_insert(0.0) += amount;
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, parameter: SabrParameter, point: GridPoint, amount: f64) -> Self {
        self.add(parameter, point, amount);
        self
    }

    /// Key-wise sum of two containers.
    pub fn plus(&self, other: &SabrSensitivity) -> Self {
        let mut result = self.clone();
        for parameter in SabrParameter::ALL {
            for (&point, &amount) in other.map(parameter) {
                result.add(parameter, point, amount);
            }
        }
        result
    }

    /// Every amount scaled by `factor`.
    pub fn multiplied_by(&self, factor: f64) -> Self {
        let scale =
            |m: &BTreeMap<GridPoint, f64>| m.iter().map(|(&p, &a)| (p, a * factor)).collect();
        Self {
            alpha: scale(&self.alpha),
            beta: scale(&self.beta),
            rho: scale(&self.rho),
            nu: scale(&self.nu),
        }
    }

    /// Amount at `point`, zero when absent.
    pub fn get(&self, parameter: SabrParameter, point: GridPoint) -> f64 {
        self.map(parameter).get(&point).copied().unwrap_or(0.0)
    }

    /// All amounts for one parameter.
    pub fn sensitivities(&self, parameter: SabrParameter) -> &BTreeMap<GridPoint, f64> {
        self.map(parameter)
    }

    /// Coordinates carrying any parameter sensitivity.
    pub fn points(&self) -> Vec<GridPoint> {
        let mut points: Vec<GridPoint> = SabrParameter::ALL
            .iter()
            .flat_map(|&p| self.map(p).keys().copied())
            .collect();
        points.sort();
        points.dedup();
        points
    }

    /// Approximate equality with absent entries treated as zero.
    pub fn compare(&self, other: &SabrSensitivity, tolerance: f64) -> bool {
        SabrParameter::ALL.iter().all(|&parameter| {
            self.map(parameter)
                .keys()
                .chain(other.map(parameter).keys())
                .all(|&point| {
                    (self.get(parameter, point) - other.get(parameter, point)).abs() <= tolerance
                })
        })
    }

    /// True if no parameter carries any entry.
    pub fn is_empty(&self) -> bool {
        SabrParameter::ALL.iter().all(|&p| self.map(p).is_empty())
    }
}
