//! ISO 4217 currency codes.
//!
//! # Examples
//!
//! ```
//! use pricer_core::types::Currency;
//!
//! let eur: Currency = "eur".parse().unwrap();
//! assert_eq!(eur, Currency::EUR);
//! assert_eq!(eur.code(), "EUR");
//! assert!("XYZ".parse::<Currency>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::CurrencyError;

/// Currencies an FX matrix can hold.
///
/// Ordered so that it can key sorted maps.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Currency {
    /// United States Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound Sterling
    GBP,
    /// Japanese Yen
    JPY,
    /// Swiss Franc
    CHF,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 5] = [
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
    ];

    /// Three-letter ISO code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Case-insensitive parse of an ISO code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| CurrencyError::UnknownCurrency(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_codes() {
        for currency in Currency::ALL {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
            assert_eq!(currency.to_string(), currency.code());
        }
    }

    #[test]
    fn test_parse_trims_and_ignores_case() {
        assert_eq!(" gbp ".parse::<Currency>().unwrap(), Currency::GBP);
    }

    #[test]
    fn test_unknown_code() {
        let err = "AUD".parse::<Currency>().unwrap_err();
        assert_eq!(err, CurrencyError::UnknownCurrency("AUD".to_string()));
    }
}
