use nalgebra::{DMatrix, DVector, Matrix2};
use tracing::debug;

use super::{Vector, DELTA2};
use crate::error::{NumericError, Result};

/// Convergence settings shared by the Newton solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonOptions {
    /// Stop once the residual norm drops below this value.
    pub delta: f64,
    /// Hard cap on the number of steps.
    pub max_iterations: usize,
}

impl Default for NewtonOptions {
    fn default() -> Self {
        Self {
            delta: DELTA2,
            max_iterations: 100,
        }
    }
}

impl NewtonOptions {
    /// Default iteration cap with a custom residual tolerance.
    #[must_use]
    pub fn with_delta(delta: f64) -> Self {
        Self {
            delta,
            ..Self::default()
        }
    }
}

/// One-dimensional Newton iteration.
///
/// Iterates `x ← x - f(x) / f'(x)` from `x0` until `|f(x)| < delta`.
///
/// # Errors
///
/// - `NumericError::SingularDerivative` if `f'(x)` vanishes
/// - `NumericError::NotConverged` if the cap is reached or the iterate leaves
///   the finite range
pub fn newton_iterate<F, D>(x0: f64, f: F, f1: D, options: NewtonOptions) -> Result<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = x0;
    for _ in 0..options.max_iterations {
        let y = f(x);
        if y.abs() < options.delta {
            return Ok(x);
        }
        let d = f1(x);
        if d == 0.0 || !d.is_finite() {
            return Err(NumericError::SingularDerivative.into());
        }
        x -= y / d;
        if !x.is_finite() {
            break;
        }
    }
    debug!(x0, x, "newton iteration did not converge");
    Err(NumericError::NotConverged {
        iterations: options.max_iterations,
    }
    .into())
}

/// Two-dimensional Newton iteration with an explicit 2x2 Jacobian.
///
/// # Errors
///
/// Same failure modes as [`newton_iterate`]; a non-invertible Jacobian is
/// reported as `SingularDerivative`.
pub fn newton_iterate2<F, J>(x0: Vector, f: F, jacobian: J, options: NewtonOptions) -> Result<Vector>
where
    F: Fn(&Vector) -> Vector,
    J: Fn(&Vector) -> Matrix2<f64>,
{
    let mut x = x0;
    for _ in 0..options.max_iterations {
        let y = f(&x);
        if y.norm() < options.delta {
            return Ok(x);
        }
        let step = jacobian(&x)
            .lu()
            .solve(&y)
            .ok_or(NumericError::SingularDerivative)?;
        x -= step;
        if !x.x.is_finite() || !x.y.is_finite() {
            break;
        }
    }
    debug!(?x0, ?x, "2d newton iteration did not converge");
    Err(NumericError::NotConverged {
        iterations: options.max_iterations,
    }
    .into())
}

/// N-dimensional Newton iteration; the Jacobian is solved with an LU decomposition.
///
/// # Errors
///
/// Same failure modes as [`newton_iterate`]. Also fails with `InvalidInput`
/// when the Jacobian shape does not match the unknown count.
pub fn newton_iterates<F, J>(
    x0: &[f64],
    f: F,
    jacobian: J,
    options: NewtonOptions,
) -> Result<Vec<f64>>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
    J: Fn(&DVector<f64>) -> DMatrix<f64>,
{
    let n = x0.len();
    let mut x = DVector::from_column_slice(x0);
    for _ in 0..options.max_iterations {
        let y = f(&x);
        if y.norm() < options.delta {
            return Ok(x.iter().copied().collect());
        }
        let jac = jacobian(&x);
        if jac.nrows() != y.len() || jac.ncols() != n {
            return Err(NumericError::InvalidInput(format!(
                "jacobian is {}x{}, expected {}x{}",
                jac.nrows(),
                jac.ncols(),
                y.len(),
                n
            ))
            .into());
        }
        let step = jac.lu().solve(&y).ok_or(NumericError::SingularDerivative)?;
        x -= step;
        if x.iter().any(|v| !v.is_finite()) {
            break;
        }
    }
    debug!(n, "n-d newton iteration did not converge");
    Err(NumericError::NotConverged {
        iterations: options.max_iterations,
    }
    .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::PlangeoError;

    #[test]
    fn square_root_of_two() {
        let x = newton_iterate(1.0, |x| x * x - 2.0, |x| 2.0 * x, NewtonOptions::with_delta(1e-12))
            .unwrap();
        assert_abs_diff_eq!(x, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn no_real_root_reports_not_converged() {
        let r = newton_iterate(0.5, |x| x * x + 1.0, |x| 2.0 * x, NewtonOptions::default());
        assert!(matches!(
            r,
            Err(PlangeoError::Numeric(
                NumericError::NotConverged { .. } | NumericError::SingularDerivative
            ))
        ));
    }

    #[test]
    fn zero_derivative_is_singular() {
        let r = newton_iterate(0.0, |x| x * x - 1.0, |x| 2.0 * x, NewtonOptions::default());
        assert!(matches!(
            r,
            Err(PlangeoError::Numeric(NumericError::SingularDerivative))
        ));
    }

    #[test]
    fn circle_line_system_2d() {
        // x² + y² = 4, y = x  → (√2, √2)
        let x = newton_iterate2(
            Vector::new(1.0, 0.5),
            |v| Vector::new(v.x * v.x + v.y * v.y - 4.0, v.y - v.x),
            |v| Matrix2::new(2.0 * v.x, 2.0 * v.y, -1.0, 1.0),
            NewtonOptions::with_delta(1e-12),
        )
        .unwrap();
        assert_abs_diff_eq!(x.x, std::f64::consts::SQRT_2, epsilon = 1e-9);
        assert_abs_diff_eq!(x.y, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn n_dimensional_system() {
        // x + y + z = 6, x - y = -1, z² = 9 → (1, 2, 3) near the seed
        let x = newton_iterates(
            &[0.5, 1.5, 2.5],
            |v| DVector::from_vec(vec![v[0] + v[1] + v[2] - 6.0, v[0] - v[1] + 1.0, v[2] * v[2] - 9.0]),
            |v| {
                DMatrix::from_row_slice(3, 3, &[1.0, 1.0, 1.0, 1.0, -1.0, 0.0, 0.0, 0.0, 2.0 * v[2]])
            },
            NewtonOptions::with_delta(1e-12),
        )
        .unwrap();
        assert_abs_diff_eq!(x[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[2], 3.0, epsilon = 1e-9);
    }
}
