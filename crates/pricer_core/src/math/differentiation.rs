//! Finite-difference Jacobians of vector-valued functions.
//!
//! Used wherever an analytic derivative is unavailable (least-squares
//! fitting) and as the reference against which analytic Jacobians are
//! checked in tests.

use crate::types::SolverError;
use nalgebra::DMatrix;

/// Central-difference Jacobian of `f` at `x`.
///
/// Entry `(i, j)` is `(f_i(x + h e_j) - f_i(x - h e_j)) / 2h`. The function
/// is evaluated `2 * x.len()` times.
///
/// # Errors
///
/// Propagates any error from `f`; returns `SolverError::DimensionMismatch`
/// (converted into `E`) when `f` changes its output length between calls.
///
/// # Example
///
/// ```
/// use pricer_core::math::differentiation::central_difference_jacobian;
/// use pricer_core::types::SolverError;
///
/// let f = |x: &[f64]| -> Result<Vec<f64>, SolverError> { Ok(vec![x[0] * x[1], x[0].powi(2)]) };
/// let jac = central_difference_jacobian(f, &[2.0, 3.0], 1e-6).unwrap();
/// assert!((jac[(0, 0)] - 3.0).abs() < 1e-8);
/// assert!((jac[(0, 1)] - 2.0).abs() < 1e-8);
/// assert!((jac[(1, 0)] - 4.0).abs() < 1e-8);
/// ```
pub fn central_difference_jacobian<F, E>(mut f: F, x: &[f64], bump: f64) -> Result<DMatrix<f64>, E>
where
    F: FnMut(&[f64]) -> Result<Vec<f64>, E>,
    E: From<SolverError>,
{
    let mut point = x.to_vec();
    let mut jacobian: Option<DMatrix<f64>> = None;

    for j in 0..x.len() {
        point[j] = x[j] + bump;
        let up = f(&point)?;
        point[j] = x[j] - bump;
        let down = f(&point)?;
        point[j] = x[j];

        if up.len() != down.len() {
            return Err(SolverError::DimensionMismatch {
                expected: up.len(),
                got: down.len(),
            }
            .into());
        }
        let jac = jacobian.get_or_insert_with(|| DMatrix::zeros(up.len(), x.len()));
        if jac.nrows() != up.len() {
            return Err(SolverError::DimensionMismatch {
                expected: jac.nrows(),
                got: up.len(),
            }
            .into());
        }
        for (i, (u, d)) in up.iter().zip(&down).enumerate() {
            jac[(i, j)] = (u - d) / (2.0 * bump);
        }
    }

    match jacobian {
        Some(jac) => Ok(jac),
        None => {
            let rows = f(x)?.len();
            Ok(DMatrix::zeros(rows, 0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_map_is_exact() {
        let f = |x: &[f64]| -> Result<Vec<f64>, SolverError> {
            Ok(vec![2.0 * x[0] - x[1], 0.5 * x[1], x[0] + x[1] + 1.0])
        };
        let jac = central_difference_jacobian(f, &[0.3, -0.7], 1e-4).unwrap();
        assert_eq!(jac.shape(), (3, 2));
        assert_relative_eq!(jac[(0, 0)], 2.0, epsilon = 1e-10);
        assert_relative_eq!(jac[(0, 1)], -1.0, epsilon = 1e-10);
        assert_relative_eq!(jac[(1, 0)], 0.0, epsilon = 1e-10);
        assert_relative_eq!(jac[(2, 1)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_nonlinear_map() {
        let f = |x: &[f64]| -> Result<Vec<f64>, SolverError> { Ok(vec![x[0].exp() * x[1].sin()]) };
        let x = [0.4, 1.1];
        let jac = central_difference_jacobian(f, &x, 1e-6).unwrap();
        assert_relative_eq!(jac[(0, 0)], x[0].exp() * x[1].sin(), epsilon = 1e-8);
        assert_relative_eq!(jac[(0, 1)], x[0].exp() * x[1].cos(), epsilon = 1e-8);
    }

    #[test]
    fn test_propagates_errors() {
        let f = |_: &[f64]| -> Result<Vec<f64>, SolverError> {
            Err(SolverError::NumericalInstability("boom".to_string()))
        };
        assert!(central_difference_jacobian(f, &[1.0], 1e-6).is_err());
    }

    #[test]
    fn test_empty_input_has_zero_columns() {
        let f = |_: &[f64]| -> Result<Vec<f64>, SolverError> { Ok(vec![1.0, 2.0]) };
        let jac = central_difference_jacobian(f, &[], 1e-6).unwrap();
        assert_eq!(jac.shape(), (2, 0));
    }
}
