//! Root-finding and least-squares solvers.
//!
//! ## Available Solvers
//!
//! - [`NewtonRaphsonSolver`]: Vector Newton iteration with analytic Jacobian,
//!   used for exact-repricing curve calibration
//! - [`LevenbergMarquardtSolver`]: Nonlinear least-squares for model fitting
//!
//! ## Configuration
//!
//! The Newton solver uses [`SolverConfig`]:
//! - `tolerance`: Residual-norm tolerance (default: 1e-10)
//! - `step_tolerance`: Step-size tolerance (default: 1e-12)
//! - `max_iterations`: Maximum iteration count (default: 100)
//!
//! The LM solver uses [`LMConfig`] with additional parameters for damping control.
//!
//! ## Examples
//!
//! ```
//! use pricer_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//!
//! // Minimize (p[0] - 2)² + (p[1] - 3)²
//! let residuals = |params: &[f64]| -> Vec<f64> {
//!     vec![params[0] - 2.0, params[1] - 3.0]
//! };
//!
//! let solver = LevenbergMarquardtSolver::with_defaults();
//! let result = solver.solve(residuals, vec![0.0, 0.0]).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.params[0] - 2.0).abs() < 1e-6);
//! ```

mod config;
mod levenberg_marquardt;
mod newton_raphson;

pub use config::SolverConfig;
pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
pub use newton_raphson::{NewtonRaphsonSolver, NewtonResult};
