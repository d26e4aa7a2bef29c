//! Stateless calculators over [`RateInstrument`].
//!
//! A [`CurveCalculator`] turns an instrument and a set of curves into one
//! number and its sensitivity to continuously compounded zero rates. Curve
//! calibration and node risk are written against this trait only.
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{CurveEnum, CurveSet};
//! use pricer_models::calculators::{CurveCalculator, ParRateCalculator};
//! use pricer_models::instruments::{Cash, RateInstrument};
//!
//! let mut curves = CurveSet::new();
//! curves.insert("USD-OIS", CurveEnum::flat(0.02));
//!
//! let deposit: RateInstrument = Cash::new("USD-OIS", 0.0, 1.0, 0.0).unwrap().into();
//! let par = ParRateCalculator.value(&deposit, &curves).unwrap();
//! assert!((par - (0.02_f64.exp() - 1.0)).abs() < 1e-15);
//! ```

use crate::instruments::{InstrumentError, RateInstrument};
use pricer_core::market_data::curves::CurveProvider;
use pricer_core::sensitivities::CurveSensitivity;

/// Value and zero-rate sensitivity of an instrument under a curve set.
pub trait CurveCalculator: Send + Sync {
    /// Scalar value of `instrument`.
    fn value(
        &self,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<f64, InstrumentError>;

    /// `d value / d r(t)` for every curve and time the value depends on.
    fn curve_sensitivity(
        &self,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError>;
}

/// Par rate of the instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParRateCalculator;

impl CurveCalculator for ParRateCalculator {
    fn value(
        &self,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<f64, InstrumentError> {
        instrument.par_rate(curves)
    }

    fn curve_sensitivity(
        &self,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        instrument.par_rate_sensitivity(curves)
    }
}

/// Present value of the instrument at its quoted rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresentValueCalculator;

impl CurveCalculator for PresentValueCalculator {
    fn value(
        &self,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<f64, InstrumentError> {
        instrument.present_value(curves)
    }

    fn curve_sensitivity(
        &self,
        instrument: &RateInstrument,
        curves: &dyn CurveProvider,
    ) -> Result<CurveSensitivity, InstrumentError> {
        instrument.present_value_sensitivity(curves)
    }
}
