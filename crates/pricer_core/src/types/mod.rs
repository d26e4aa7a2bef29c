//! Core error types shared by every layer, and currencies.
//!
//! # Re-exports
//!
//! [`ErrorCategory`], [`CurrencyError`], [`InterpolationError`] and
//! [`SolverError`] from `error`; [`Currency`] from `currency`.

pub mod currency;
pub mod error;

pub use currency::Currency;
pub use error::{CurrencyError, ErrorCategory, InterpolationError, SolverError};
