//! Named collections of yield curves.
//!
//! This module provides:
//! - [`CurveProvider`]: Lookup of a curve by name and of spot FX rates
//! - [`CurveSet`]: Container for managing multiple named yield curves
//! - [`CurveBundle`]: Known curves held fixed plus curves being solved for

use super::CurveEnum;
use crate::market_data::error::MarketDataError;
use crate::market_data::fx::FxMatrix;
use crate::types::{Currency, CurrencyError};
use std::collections::BTreeMap;

/// Lookup of yield curves by name.
///
/// Pricing code only ever asks a provider for curves, so the same code
/// prices against a plain [`CurveSet`] or a [`CurveBundle`] mid-calibration.
pub trait CurveProvider {
    /// Curve registered under `name`.
    ///
    /// # Errors
    ///
    /// `CurveNotFound` if no curve has that name.
    fn curve(&self, name: &str) -> Result<&CurveEnum, MarketDataError>;

    /// Whether a curve is registered under `name`.
    fn contains_curve(&self, name: &str) -> bool {
        self.curve(name).is_ok()
    }

    /// Spot rates attached to the curves, if any.
    fn fx_matrix(&self) -> Option<&FxMatrix> {
        None
    }

    /// Units of `to` bought by one unit of `from` at spot.
    ///
    /// # Errors
    ///
    /// `Currency(MissingRate)` if the currencies differ and no attached
    /// matrix holds both.
    fn fx_rate(&self, from: Currency, to: Currency) -> Result<f64, MarketDataError> {
        if from == to {
            return Ok(1.0);
        }
        match self.fx_matrix() {
            Some(fx) => Ok(fx.fx_rate(from, to)?),
            None => Err(CurrencyError::MissingRate { from, to }.into()),
        }
    }
}

/// Container for multiple named yield curves.
///
/// Curves are keyed by name and iterate in name order.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, CurveProvider, CurveSet, YieldCurve};
///
/// let mut curves = CurveSet::new();
/// curves.insert("USD-OIS", CurveEnum::flat(0.03));
/// curves.insert("USD-LIBOR-3M", CurveEnum::flat(0.035));
///
/// let df = curves.curve("USD-OIS").unwrap().discount_factor(1.0).unwrap();
/// assert!((df - (-0.03f64).exp()).abs() < 1e-12);
/// assert!(curves.curve("EUR-OIS").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurveSet {
    curves: BTreeMap<String, CurveEnum>,
    fx: Option<FxMatrix>,
}

impl CurveSet {
    /// Create an empty curve set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a curve, returning the previous curve of that name.
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, curve: CurveEnum) -> Option<CurveEnum> {
        self.curves.insert(name.into(), curve)
    }

    /// Insert a curve, failing if the name is already taken.
    ///
    /// # Errors
    ///
    /// `DuplicateCurve` if `name` is present.
    pub fn try_insert(
        &mut self,
        name: impl Into<String>,
        curve: CurveEnum,
    ) -> Result<(), MarketDataError> {
        let name = name.into();
        if self.curves.contains_key(&name) {
            return Err(MarketDataError::DuplicateCurve { name });
        }
        self.curves.insert(name, curve);
        Ok(())
    }

    /// Curve registered under `name`, if any.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&CurveEnum> {
        self.curves.get(name)
    }

    /// Whether `name` is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Remove and return a curve.
    #[inline]
    pub fn remove(&mut self, name: &str) -> Option<CurveEnum> {
        self.curves.remove(name)
    }

    /// Number of curves.
    #[inline]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterate over `(name, curve)` pairs in name order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CurveEnum)> {
        self.curves.iter().map(|(name, curve)| (name.as_str(), curve))
    }

    /// Iterate over curve names in order.
    #[inline]
    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    /// Attach spot FX rates.
    pub fn with_fx_matrix(mut self, fx: FxMatrix) -> Self {
        self.fx = Some(fx);
        self
    }
}

impl CurveProvider for CurveSet {
    fn curve(&self, name: &str) -> Result<&CurveEnum, MarketDataError> {
        self.curves
            .get(name)
            .ok_or_else(|| MarketDataError::CurveNotFound {
                name: name.to_string(),
            })
    }

    fn contains_curve(&self, name: &str) -> bool {
        self.contains(name)
    }

    fn fx_matrix(&self) -> Option<&FxMatrix> {
        self.fx.as_ref()
    }
}

impl FromIterator<(String, CurveEnum)> for CurveSet {
    fn from_iter<I: IntoIterator<Item = (String, CurveEnum)>>(iter: I) -> Self {
        Self {
            curves: iter.into_iter().collect(),
            fx: None,
        }
    }
}

/// Immutable pair of fixed ("known") curves and curves being solved for.
///
/// The two sets never share a name; that is checked once at construction.
/// Spot FX rates, when attached, convert values between the currencies
/// of the curves.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveBundle, CurveEnum, CurveProvider, CurveSet};
///
/// let mut known = CurveSet::new();
/// known.insert("DSC", CurveEnum::flat(0.02));
/// let mut solved = CurveSet::new();
/// solved.insert("FWD", CurveEnum::flat(0.03));
///
/// let bundle = CurveBundle::new(known.clone(), solved).unwrap();
/// assert!(bundle.contains_curve("DSC"));
/// assert!(bundle.contains_curve("FWD"));
///
/// let mut clash = CurveSet::new();
/// clash.insert("DSC", CurveEnum::flat(0.01));
/// assert!(CurveBundle::new(known, clash).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CurveBundle {
    known: CurveSet,
    solved: CurveSet,
    fx: Option<FxMatrix>,
}

impl CurveBundle {
    /// Pair `known` and `solved` curves.
    ///
    /// # Errors
    ///
    /// `DuplicateCurve` if a name appears in both sets.
    pub fn new(known: CurveSet, solved: CurveSet) -> Result<Self, MarketDataError> {
        if let Some(name) = solved.curve_names().find(|name| known.contains(name)) {
            return Err(MarketDataError::DuplicateCurve {
                name: name.to_string(),
            });
        }
        Ok(Self {
            known,
            solved,
            fx: None,
        })
    }

    /// Attach spot FX rates.
    pub fn with_fx_matrix(mut self, fx: FxMatrix) -> Self {
        self.fx = Some(fx);
        self
    }

    /// Curves held fixed.
    #[inline]
    pub fn known(&self) -> &CurveSet {
        &self.known
    }

    /// Curves being solved for.
    #[inline]
    pub fn solved(&self) -> &CurveSet {
        &self.solved
    }

    /// Whether `name` is one of the solved curves.
    #[inline]
    pub fn is_solved(&self, name: &str) -> bool {
        self.solved.contains(name)
    }

    /// Split back into `(known, solved)`.
    pub fn into_parts(self) -> (CurveSet, CurveSet) {
        (self.known, self.solved)
    }
}

impl CurveProvider for CurveBundle {
    fn curve(&self, name: &str) -> Result<&CurveEnum, MarketDataError> {
        self.solved
            .get(name)
            .or_else(|| self.known.get(name))
            .ok_or_else(|| MarketDataError::CurveNotFound {
                name: name.to_string(),
            })
    }

    fn contains_curve(&self, name: &str) -> bool {
        self.solved.contains(name) || self.known.contains(name)
    }

    fn fx_matrix(&self) -> Option<&FxMatrix> {
        self.fx.as_ref()
    }
}
