//! Spot FX rates between a set of currencies.

use crate::types::{Currency, CurrencyError};
use std::collections::BTreeMap;

/// Consistent spot rates between currencies.
///
/// Every currency is stored as its value in the first currency added, so
/// any two held currencies have a rate and triangulation is exact.
/// `fx_rate(a, b)` is the number of units of `b` one unit of `a` buys.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::FxMatrix;
/// use pricer_core::types::Currency;
///
/// // 1 EUR = 1.10 USD, 1 USD = 150 JPY
/// let fx = FxMatrix::new()
///     .with_currency(Currency::EUR, Currency::USD, 1.10)
///     .unwrap()
///     .with_currency(Currency::JPY, Currency::USD, 1.0 / 150.0)
///     .unwrap();
///
/// assert!((fx.fx_rate(Currency::EUR, Currency::JPY).unwrap() - 165.0).abs() < 1e-10);
/// assert_eq!(fx.convert(2.0, Currency::USD, Currency::USD).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxMatrix {
    /// Value of one unit in the first currency added.
    values: BTreeMap<Currency, f64>,
}

impl FxMatrix {
    /// Matrix without currencies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `currency` at `rate` units of `reference` per unit.
    ///
    /// The first call seeds the matrix with `reference`.
    ///
    /// # Errors
    ///
    /// * `InvalidRate` - `rate` not positive and finite
    /// * `DuplicateCurrency` - `currency` already held
    /// * `MissingRate` - `reference` not held (after the first call)
    pub fn with_currency(
        mut self,
        currency: Currency,
        reference: Currency,
        rate: f64,
    ) -> Result<Self, CurrencyError> {
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(CurrencyError::InvalidRate { currency, rate });
        }
        if self.values.is_empty() {
            self.values.insert(reference, 1.0);
        }
        if self.values.contains_key(&currency) {
            return Err(CurrencyError::DuplicateCurrency(currency));
        }
        let reference_value = *self.values.get(&reference).ok_or(CurrencyError::MissingRate {
            from: currency,
            to: reference,
        })?;
        self.values.insert(currency, rate * reference_value);
        Ok(self)
    }

    /// Units of `to` bought by one unit of `from`.
    ///
    /// A currency always converts to itself at 1, held or not.
    ///
    /// # Errors
    ///
    /// `MissingRate` if either currency is not held.
    pub fn fx_rate(&self, from: Currency, to: Currency) -> Result<f64, CurrencyError> {
        if from == to {
            return Ok(1.0);
        }
        match (self.values.get(&from), self.values.get(&to)) {
            (Some(a), Some(b)) => Ok(a / b),
            _ => Err(CurrencyError::MissingRate { from, to }),
        }
    }

    /// `amount` of `from` expressed in `to`.
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> Result<f64, CurrencyError> {
        Ok(amount * self.fx_rate(from, to)?)
    }

    /// Whether `currency` is held.
    pub fn contains(&self, currency: Currency) -> bool {
        self.values.contains_key(&currency)
    }

    /// Held currencies in order.
    pub fn currencies(&self) -> impl Iterator<Item = Currency> + '_ {
        self.values.keys().copied()
    }

    /// Whether no currency is held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
