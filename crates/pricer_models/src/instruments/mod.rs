//! Linear rate instruments used for curve calibration and risk.
//!
//! Every instrument reports its par rate, its present value and the
//! sensitivities of both to continuously compounded zero rates, as a
//! [`CurveSensitivity`](pricer_core::sensitivities::CurveSensitivity)
//! keyed by curve name and time.
//!
//! - [`Cash`]: Deposit on a single curve
//! - [`Fra`]: Forward rate agreement
//! - [`Swap`]: Fixed/floating swap on discount and forward curves
//! - [`FxForward`]: Outright FX forward on two discount curves, valued in
//!   the domestic currency through the provider's spot rates
//! - [`RateInstrument`]: Static dispatch enum over the above

mod cash;
mod error;
pub(crate) mod forward;
mod fra;
mod fx_forward;
mod instrument_enum;
mod swap;

pub use cash::Cash;
pub use error::InstrumentError;
pub use fra::Fra;
pub use fx_forward::FxForward;
pub use instrument_enum::RateInstrument;
pub use swap::{FixedLeg, FloatingLeg, FloatingPeriod, Swap, SwapDirection};
