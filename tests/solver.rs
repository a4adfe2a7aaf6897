//! Integration tests for the Gauss-Jordan solver and the least-squares wrapper.

use approx::assert_abs_diff_eq;
use lazy_linalg::math::{Matrix, MatrixExpr, Vector};
use lazy_linalg::solver::{mean_square_solve, mean_square_solve_with, solve, solve_with};
use lazy_linalg::{LinalgError, PivotRule, SolverConfig};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn assert_matrix_close(actual: &Matrix<f64>, expected: &Matrix<f64>, eps: f64) {
    assert_eq!(actual.shape(), expected.shape());
    for (a, e) in actual.as_slice().iter().zip(expected.as_slice()) {
        assert_abs_diff_eq!(*a, *e, epsilon = eps);
    }
}

fn well_conditioned() -> Matrix<f64> {
    Matrix::new(3, 3, vec![4.0, 1.0, 2.0, 1.0, 5.0, -1.0, 2.0, -1.0, 6.0]).unwrap()
}

#[test]
fn half_identity_inverts_to_twice_identity() {
    init_logger();
    let id = Matrix::<f64>::identity(3);
    let x = solve(0.5 * &id, &id).unwrap();
    assert_matrix_close(&x, &(2.0 * &id).eval(), 1e-15);
}

#[test]
fn solution_satisfies_the_system() {
    init_logger();
    let a = well_conditioned();
    let b = Matrix::new(3, 2, vec![1.0, 0.0, 2.0, 1.0, 3.0, -1.0]).unwrap();
    let x = solve(&a, &b).unwrap();
    assert_eq!(x.shape(), (3, 2));
    assert_matrix_close(&(&a * &x).eval(), &b, 1e-12);
}

#[test]
fn inputs_are_not_mutated() {
    let a = well_conditioned();
    let b = Vector::new(vec![1.0, 2.0, 3.0]);
    let a_before = a.clone();
    let b_before = b.clone();
    let _ = solve(&a, &b).unwrap();
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn inverse_agrees_on_both_sides() {
    let a = well_conditioned();
    let id = Matrix::<f64>::identity(3);
    let inv = solve(&a, &id).unwrap();
    assert_matrix_close(&(&inv * &a).eval(), &id, 1e-12);
    assert_matrix_close(&(&a * &inv).eval(), &id, 1e-12);
}

#[test]
fn solve_accepts_lazy_operands() {
    let a = well_conditioned();
    let x = Vector::new(vec![1.0, -2.0, 0.5]);
    // B = (A + Aᵗ) x, built lazily and never materialised by the caller.
    let sol = solve(&a + a.transpose(), (&a + a.transpose()) * &x).unwrap();
    assert_matrix_close(&sol, &Matrix::from_expr(&x), 1e-12);
}

#[test]
fn singular_matrix_is_flagged() {
    init_logger();
    let a = Matrix::new(3, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
    let id = Matrix::<f64>::identity(3);
    match solve(&a, &id) {
        Err(LinalgError::SingularMatrix { column }) => assert_eq!(column, 2),
        other => panic!("singular system must be rejected, got {:?}", other),
    }
    let config = SolverConfig::default().with_pivot(PivotRule::LargestMagnitude);
    assert!(matches!(
        solve_with(&a, &id, &config),
        Err(LinalgError::SingularMatrix { .. })
    ));
}

#[test]
fn zero_matrix_is_singular_in_first_column() {
    let a = Matrix::<f64>::zeros(2, 2);
    let b = Matrix::<f64>::identity(2);
    assert_eq!(
        solve(&a, &b).unwrap_err(),
        LinalgError::SingularMatrix { column: 0 }
    );
}

#[test]
fn badly_scaled_invertible_system_is_solved() {
    let mut a = Matrix::<f64>::identity(2);
    a[(0, 0)] = 1e-13;
    let id = Matrix::<f64>::identity(2);
    let inv = solve(&a, &id).unwrap();
    assert_abs_diff_eq!(inv[(0, 0)], 1e13, epsilon = 1.0);
    assert_abs_diff_eq!(inv[(1, 1)], 1.0, epsilon = 1e-15);
    assert_matrix_close(&(&a * &inv).eval(), &id, 1e-12);
}

#[test]
fn relative_tolerance_is_opt_in() {
    let mut a = Matrix::<f64>::identity(2);
    a[(0, 0)] = 1e-13;
    let id = Matrix::<f64>::identity(2);
    let config = SolverConfig::default().with_singular_tolerance(Some(1e-12));
    assert_eq!(
        solve_with(&a, &id, &config).unwrap_err(),
        LinalgError::SingularMatrix { column: 0 }
    );
}

#[test]
fn disabled_singularity_check_propagates_non_finite_values() {
    let a = Matrix::<f64>::zeros(2, 2);
    let b = Matrix::<f64>::identity(2);
    let config = SolverConfig::default().with_singular_tolerance(None);
    let x = solve_with(&a, &b, &config).unwrap();
    assert!(x.as_slice().iter().any(|v| !v.is_finite()));
}

#[test]
fn signed_pivot_rule_trips_on_negative_column() {
    // Nonsingular, but the only nonzero entry of column 0 is negative.
    let a = Matrix::new(2, 2, vec![0.0, 1.0, -1.0, 0.0]).unwrap();
    let b = Matrix::<f64>::identity(2);
    assert_eq!(
        solve(&a, &b).unwrap_err(),
        LinalgError::SingularMatrix { column: 0 }
    );

    let config = SolverConfig::default().with_pivot(PivotRule::LargestMagnitude);
    let inv = solve_with(&a, &b, &config).unwrap();
    assert_matrix_close(&(&a * &inv).eval(), &b, 1e-15);
}

#[test]
fn rejects_mismatched_right_hand_side() {
    let a = well_conditioned();
    let b = Matrix::<f64>::zeros(2, 1);
    assert_eq!(
        solve(&a, &b).unwrap_err(),
        LinalgError::DimensionMismatch {
            operation: "solve",
            left: (3, 3),
            right: (2, 1),
        }
    );
}

#[test]
fn mean_square_solve_diagonal_system() {
    let x = Vector::new(vec![1.0, 2.0, 3.0]);
    let mut m = Matrix::<f64>::zeros(3, 3);
    m[(0, 0)] = 1.0;
    m[(1, 1)] = 2.0;
    m[(2, 2)] = 3.0;
    let sol = mean_square_solve(&m, 2.0 * &x).unwrap();
    assert_matrix_close(&sol, &Matrix::from_elem(3, 1, 2.0), 1e-12);
}

#[test]
fn mean_square_solve_fits_a_line() {
    // y = 1 + 2t sampled without noise; the least-squares fit is exact.
    let ts = [0.0, 1.0, 2.0, 3.0];
    let mut design = Matrix::<f64>::zeros(4, 2);
    let mut y = Vector::<f64>::zeros(4);
    for (i, t) in ts.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = *t;
        y[i] = 1.0 + 2.0 * t;
    }
    let coef = mean_square_solve(&design, &y).unwrap();
    assert_abs_diff_eq!(coef[(0, 0)], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(coef[(1, 0)], 2.0, epsilon = 1e-10);
}

#[test]
fn mean_square_solve_minimises_residual_for_overdetermined_system() {
    let a = Matrix::new(3, 1, vec![1.0, 1.0, 1.0]).unwrap();
    let b = Vector::new(vec![1.0, 2.0, 6.0]);
    let config = SolverConfig::default().with_pivot(PivotRule::LargestMagnitude);
    let mean = mean_square_solve_with(&a, &b, &config).unwrap();
    assert_abs_diff_eq!(mean[(0, 0)], 3.0, epsilon = 1e-12);
}

#[test]
fn mean_square_solve_rejects_row_mismatch() {
    let a = Matrix::<f64>::zeros(3, 2);
    let b = Matrix::<f64>::zeros(2, 1);
    assert!(matches!(
        mean_square_solve(&a, &b),
        Err(LinalgError::DimensionMismatch { .. })
    ));
}

#[test]
fn f32_solve() {
    let a = Matrix::new(2, 2, vec![2.0f32, 0.0, 0.0, 4.0]).unwrap();
    let b = Vector::new(vec![1.0f32, 1.0]);
    let x = solve(&a, &b).unwrap();
    assert_eq!(x.as_slice(), &[0.5, 0.25]);
}
