//! # Pricer Models (L2: Business Logic)
//!
//! Rate instruments, calculators and volatility models.
//!
//! This crate provides:
//! - Calibration instruments (cash, FRA, swap, FX forward) with analytic zero-rate
//!   sensitivities
//! - Stateless par-rate and present-value calculators
//! - Black-76 formula
//! - SABR model and single-smile SABR calibration
//!
//! ## Design Principles
//!
//! - **Enum-based instruments** for static dispatch
//! - **Stateless calculators** injected where a value is needed
//! - **Continuous sensitivities** expressed as `d/dr(t)` of zero rates

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod calculators;
pub mod calibration;
pub mod instruments;
pub mod models;
