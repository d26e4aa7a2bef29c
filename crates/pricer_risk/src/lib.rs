//! # Pricer Risk (L4: Application)
//!
//! Node-level risk for calibrated market objects.
//!
//! This crate provides:
//! - [`curves::NodeSensitivityTransformer`]: continuous zero-rate
//!   sensitivities onto curve nodes, either through interpolation weights
//!   alone or through the inverse calibration Jacobian to quote risk
//! - [`sabr::SabrSensitivityRedistributor`]: SABR parameter sensitivities
//!   from trade coordinates onto surface nodes, then to Black volatility
//!   risk per calibration strike
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            pricer_risk (L4)             │
//! ├─────────────────────────────────────────┤
//! │  curves/  - Curve node sensitivities    │
//! │  sabr/    - SABR node and Black risk    │
//! └─────────────────────────────────────────┘
//!          ↓
//! ┌─────────────────────────────────────────┐
//! │         pricer_optimiser (L2.5)         │
//! │  Multi-curve solve, SABR surfaces       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pricer_core::market_data::curves::{CurveInterpolation, CurveSet};
//! use pricer_models::calculators::{ParRateCalculator, PresentValueCalculator};
//! use pricer_models::instruments::{Cash, RateInstrument};
//! use pricer_optimiser::bootstrapping::{CalibrationNodeSet, MultiCurveFinder, MultiCurveProblem};
//! use pricer_risk::curves::NodeSensitivityTransformer;
//!
//! let deposits: Vec<RateInstrument> = [1.0, 2.0]
//!     .iter()
//!     .map(|&t| Cash::new("USD-OIS", 0.0, t, 0.03).unwrap().into())
//!     .collect();
//! let nodes = CalibrationNodeSet::new()
//!     .with_curve("USD-OIS", vec![1.0, 2.0], CurveInterpolation::Linear)
//!     .unwrap();
//! let problem = MultiCurveProblem::at_quotes(deposits, nodes, CurveSet::new()).unwrap();
//! let finder = MultiCurveFinder::new(problem, ParRateCalculator);
//! let solution = finder.solve().unwrap();
//!
//! let trade: RateInstrument = Cash::new("USD-OIS", 0.0, 1.5, 0.04).unwrap().into();
//! let quote_risk = NodeSensitivityTransformer::from_solution(&finder, &solution)
//!     .unwrap()
//!     .node_sensitivities(&PresentValueCalculator, &trade, &solution.curves)
//!     .unwrap();
//! assert_eq!(quote_risk.len(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod curves;
pub mod error;
pub mod sabr;

pub use error::RiskError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::curves::*;
    pub use crate::error::RiskError;
    pub use crate::sabr::*;
}
