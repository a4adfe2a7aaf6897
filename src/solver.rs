//! Dense linear system solvers.
//!
//! `solve` runs Gauss-Jordan elimination with partial pivoting on `A X = B`,
//! and `mean_square_solve` feeds the normal equations `(Aᵗ A) X = Aᵗ B` through
//! the same routine to get a least-squares solution.

use num_traits::{Float, One, Zero};

use crate::config::{PivotRule, SolverConfig};
use crate::error::{LinalgError, Result};
use crate::math::{Matrix, MatrixExpr, Scalar};

/// Solve `A X = B` with the default `SolverConfig`.
///
/// Both operands are materialised first, so they are never modified. `A` must
/// be square and `B` must have as many rows as `A`. A zero or non-finite pivot
/// is reported as `SingularMatrix`.
///
/// # Example
///
/// ```
/// use lazy_linalg::math::{Matrix, MatrixExpr};
/// use lazy_linalg::solver::solve;
///
/// let id = Matrix::<f64>::identity(3);
/// let x = solve(0.5 * &id, &id).unwrap();
/// assert_eq!(x, (2.0 * &id).eval());
/// ```
pub fn solve<A, B>(a: A, b: B) -> Result<Matrix<A::Elem>>
where
    A: MatrixExpr,
    B: MatrixExpr<Elem = A::Elem>,
{
    solve_with(a, b, &SolverConfig::default())
}

/// Solve `A X = B` with an explicit configuration.
pub fn solve_with<A, B>(a: A, b: B, config: &SolverConfig) -> Result<Matrix<A::Elem>>
where
    A: MatrixExpr,
    B: MatrixExpr<Elem = A::Elem>,
{
    let mut a = Matrix::from_expr(a);
    let mut b = Matrix::from_expr(b);
    let n = a.ncols();
    let m = b.ncols();
    if a.nrows() != n || b.nrows() != n {
        return Err(LinalgError::mismatch("solve", a.shape(), b.shape()));
    }

    log::debug!(
        "Solving {}x{} system with {} right-hand side(s), pivot rule {:?}",
        n,
        n,
        m,
        config.pivot
    );

    let threshold = config.singular_tolerance.map(|tol| {
        if tol > 0.0 {
            A::Elem::from_f64(tol) * a.max_abs()
        } else {
            <A::Elem as Zero>::zero()
        }
    });

    for i in 0..n {
        let (pivot_row, pivot) = select_pivot(&a, i, config.pivot);
        log::trace!("column {}: pivot {} taken from row {}", i, pivot, pivot_row);

        if let Some(threshold) = threshold {
            if !Float::is_finite(pivot) || !(Float::abs(pivot) > threshold) {
                log::warn!(
                    "Rejecting pivot {} in column {} (threshold {})",
                    pivot,
                    i,
                    threshold
                );
                return Err(LinalgError::SingularMatrix { column: i });
            }
        }

        a.swap_rows(i, pivot_row);
        b.swap_rows(i, pivot_row);

        // A(i, i) is implicitly 1 from here on and never read again.
        let inv = <A::Elem as One>::one() / pivot;
        for col in i + 1..n {
            a[(i, col)] *= inv;
        }
        for col in 0..m {
            b[(i, col)] *= inv;
        }

        for row in 0..n {
            if row == i {
                continue;
            }
            let coef = a[(row, i)];
            for col in i + 1..n {
                let delta = coef * a[(i, col)];
                a[(row, col)] -= delta;
            }
            for col in 0..m {
                let delta = coef * b[(i, col)];
                b[(row, col)] -= delta;
            }
        }
    }

    Ok(b)
}

/// Least-squares solution of `A X ≈ B` through the normal equations.
pub fn mean_square_solve<A, B>(a: A, b: B) -> Result<Matrix<A::Elem>>
where
    A: MatrixExpr,
    B: MatrixExpr<Elem = A::Elem>,
{
    mean_square_solve_with(a, b, &SolverConfig::default())
}

pub fn mean_square_solve_with<A, B>(a: A, b: B, config: &SolverConfig) -> Result<Matrix<A::Elem>>
where
    A: MatrixExpr,
    B: MatrixExpr<Elem = A::Elem>,
{
    if a.nrows() != b.nrows() {
        return Err(LinalgError::mismatch("mean square solve", a.shape(), b.shape()));
    }
    // Materialise once: every cell of a product reads a whole row and column.
    let a = Matrix::from_expr(a);
    let b = Matrix::from_expr(b);
    solve_with(a.transpose() * &a, a.transpose() * &b, config)
}

fn select_pivot<T: Scalar>(a: &Matrix<T>, col: usize, rule: PivotRule) -> (usize, T) {
    let mut best_row = col;
    let mut best = a[(col, col)];
    for row in col + 1..a.nrows() {
        let candidate = a[(row, col)];
        let better = match rule {
            PivotRule::LargestValue => candidate > best,
            PivotRule::LargestMagnitude => candidate.abs() > best.abs(),
        };
        if better {
            best = candidate;
            best_row = row;
        }
    }
    (best_row, best)
}
