//! Volatility models.
//!
//! - [`SabrParameters`]: SABR parameter set with the Hagan et al. (2002)
//!   lognormal implied volatility approximation

pub mod sabr;

pub use sabr::{SabrError, SabrParameters};
