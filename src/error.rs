use std::error::Error;
use std::fmt;

/// Errors raised by matrix construction, expression building and the solver.
#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    /// A flat buffer does not hold `rows * cols` values.
    InvalidShape { rows: usize, cols: usize, len: usize },
    /// Operand shapes are incompatible for `operation`.
    DimensionMismatch {
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Elimination found a zero (or near-zero) pivot in `column`.
    SingularMatrix { column: usize },
    IndexOutOfBounds {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },
}

impl LinalgError {
    pub(crate) fn mismatch(
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        LinalgError::DimensionMismatch {
            operation,
            left,
            right,
        }
    }
}

impl fmt::Display for LinalgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinalgError::InvalidShape { rows, cols, len } => write!(
                f,
                "invalid shape ({}, {}) for buffer of length {}",
                rows, cols, len
            ),
            LinalgError::DimensionMismatch {
                operation,
                left,
                right,
            } => write!(
                f,
                "dimension mismatch in {}: left is {}x{}, right is {}x{}",
                operation, left.0, left.1, right.0, right.1
            ),
            LinalgError::SingularMatrix { column } => write!(
                f,
                "matrix is singular: zero or near-zero pivot in column {}",
                column
            ),
            LinalgError::IndexOutOfBounds { row, col, shape } => write!(
                f,
                "index ({}, {}) is out of bounds for a {}x{} matrix",
                row, col, shape.0, shape.1
            ),
        }
    }
}

impl Error for LinalgError {}

/// Result type for fallible linear algebra operations.
pub type Result<T> = std::result::Result<T, LinalgError>;
