//! Dense storage types and the lazy expression graph built on top of them.
//!
//! `Matrix` (2D) and `Vector` (1D, one column) own their buffers. Borrowing
//! either one yields a `MatrixExpr`, and arithmetic on expressions builds
//! `Sum`, `Difference`, `Product`, `Scale` and `Transpose` nodes that are only
//! evaluated when materialised.
pub mod expression;
pub mod matrix;
mod ops;
pub mod scalar;
pub mod vector;

pub use expression::{
    format_expr, format_value, print, print_stdout, Difference, MatrixExpr, Product, Scale, Sum,
    Transpose,
};
pub use matrix::Matrix;
pub use scalar::Scalar;
pub use vector::Vector;
