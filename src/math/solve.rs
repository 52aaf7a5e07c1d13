//! Square linear solves for spline collocation.
//!
//! Interpolation conditions give one equation per sample, so the collocation
//! matrix is square (`n × n`) and banded with bandwidth `k + 1`. For the sizes
//! we see (a few hundred points at most) a dense LU with partial pivoting is
//! plenty fast and keeps the code simple.

use nalgebra::{DMatrix, DVector};

/// Solve `a · x = b` for each column of `rhs` using a shared LU factorization.
///
/// Returns `None` if the matrix is singular or the solution is not finite.
pub fn solve_square(a: &DMatrix<f64>, rhs: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    if !a.is_square() || a.nrows() != rhs.nrows() {
        return None;
    }
    let lu = a.clone().lu();
    let x = lu.solve(rhs)?;
    if x.iter().all(|v| v.is_finite()) {
        Some(x)
    } else {
        None
    }
}

/// Convenience wrapper for a single right-hand side.
pub fn solve_vector(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    let rhs = DMatrix::from_column_slice(b.len(), 1, b.as_slice());
    let x = solve_square(a, &rhs)?;
    Some(x.column(0).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_small_system() {
        // 2x + y = 5, x + 3y = 10  ->  x = 1, y = 3
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_row_slice(&[5.0, 10.0]);
        let x = solve_vector(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let rhs = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert!(solve_square(&a, &rhs).is_none());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        let rhs = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert!(solve_square(&a, &rhs).is_none());
    }
}
