//! Numerical building blocks: interpolation, solvers and finite differences.

pub mod differentiation;
pub mod interpolators;
pub mod solvers;
