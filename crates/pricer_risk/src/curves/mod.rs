//! Curve node risk.

mod node_sensitivity;

pub use node_sensitivity::{NodeSensitivityTransformer, TransformMode};
