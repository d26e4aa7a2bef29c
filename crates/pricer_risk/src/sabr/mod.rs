//! SABR parameter risk on surface grids.

mod redistributor;

pub use redistributor::{BlackSensitivity, SabrSensitivityRedistributor};
