//! lazy-linalg: a small dense linear algebra kernel.
//!
//! This crate provides owned `Matrix`/`Vector` storage, a lazy expression graph
//! (sum, difference, product, scaling, transpose) evaluated cell by cell when
//! materialised, and a Gauss-Jordan solver with a least-squares wrapper.
//!
//! The design favors small, testable modules. Shape errors are reported as
//! `LinalgError` values by the fallible APIs; the operator sugar panics with
//! the same message.
pub mod config;
pub mod error;
pub mod math;
pub mod solver;

pub use config::{PivotRule, SolverConfig};
pub use error::{LinalgError, Result};
pub use math::{print, Matrix, MatrixExpr, Vector};
pub use solver::{mean_square_solve, solve};
