//! Analytical formulas.
//!
//! - Black-76 prices and vega for options on forward rates
//! - Standard normal CDF and PDF

pub mod black;
pub mod distributions;
pub mod error;

pub use black::{Black76, OptionType};
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
