//! Lazy expression nodes over dense storage.
//!
//! An expression is anything that can report its shape and produce the value
//! of a single cell. `&Matrix`, `&Vector` and the composite nodes below all
//! qualify, so arithmetic can be chained without allocating:
//!
//! ```
//! use lazy_linalg::math::{Matrix, MatrixExpr, Vector};
//!
//! let x = Vector::new(vec![1.0f64, 2.0, 3.0]);
//! let outer = 2.0 * &x * x.transpose();
//! let m: Matrix<f64> = outer.eval();
//! assert_eq!(m[(1, 2)], 12.0);
//! ```
//!
//! Composite nodes own their sub-nodes and borrow the storage at the leaves,
//! so the borrow checker guarantees an expression never outlives its data.
//! Nodes over borrowed leaves are `Copy`, which is how one subexpression is
//! reused in several places.
//! Nothing is cached: every `element` call re-evaluates the tree below it, and
//! a `Product` cell costs a full inner product.

use std::io::{self, Write};

use num_traits::{ToPrimitive, Zero};

use crate::error::{LinalgError, Result};
use crate::math::matrix::Matrix;
use crate::math::scalar::Scalar;

/// Read-only, lazily evaluated view of a matrix-shaped value.
pub trait MatrixExpr {
    type Elem: Scalar;

    fn nrows(&self) -> usize;

    fn ncols(&self) -> usize;

    /// Value at (`row`, `col`). Callers keep indices inside `shape()`.
    fn element(&self, row: usize, col: usize) -> Self::Elem;

    fn shape(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    /// Materialise the expression into an owned `Matrix`.
    fn eval(&self) -> Matrix<Self::Elem> {
        Matrix::materialize(self)
    }

    fn transpose(self) -> Transpose<Self>
    where
        Self: Sized,
    {
        Transpose::new(self)
    }

    fn scale(self, scalar: Self::Elem) -> Scale<Self>
    where
        Self: Sized,
    {
        Scale::new(scalar, self)
    }

    fn try_add<R>(self, rhs: R) -> Result<Sum<Self, R>>
    where
        Self: Sized,
        R: MatrixExpr<Elem = Self::Elem>,
    {
        Sum::new(self, rhs)
    }

    fn try_sub<R>(self, rhs: R) -> Result<Difference<Self, R>>
    where
        Self: Sized,
        R: MatrixExpr<Elem = Self::Elem>,
    {
        Difference::new(self, rhs)
    }

    fn try_mul<R>(self, rhs: R) -> Result<Product<Self, R>>
    where
        Self: Sized,
        R: MatrixExpr<Elem = Self::Elem>,
    {
        Product::new(self, rhs)
    }
}

/// Element-wise sum of two equally shaped expressions.
#[derive(Clone, Copy, Debug)]
pub struct Sum<L, R> {
    left: L,
    right: R,
}

impl<L, R> Sum<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
{
    pub fn new(left: L, right: R) -> Result<Self> {
        if left.shape() != right.shape() {
            return Err(LinalgError::mismatch("sum", left.shape(), right.shape()));
        }
        Ok(Self { left, right })
    }
}

impl<L, R> MatrixExpr for Sum<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
{
    type Elem = L::Elem;

    fn nrows(&self) -> usize {
        self.left.nrows()
    }

    fn ncols(&self) -> usize {
        self.left.ncols()
    }

    fn element(&self, row: usize, col: usize) -> Self::Elem {
        self.left.element(row, col) + self.right.element(row, col)
    }
}

/// Element-wise difference of two equally shaped expressions.
#[derive(Clone, Copy, Debug)]
pub struct Difference<L, R> {
    left: L,
    right: R,
}

impl<L, R> Difference<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
{
    pub fn new(left: L, right: R) -> Result<Self> {
        if left.shape() != right.shape() {
            return Err(LinalgError::mismatch(
                "difference",
                left.shape(),
                right.shape(),
            ));
        }
        Ok(Self { left, right })
    }
}

impl<L, R> MatrixExpr for Difference<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
{
    type Elem = L::Elem;

    fn nrows(&self) -> usize {
        self.left.nrows()
    }

    fn ncols(&self) -> usize {
        self.left.ncols()
    }

    fn element(&self, row: usize, col: usize) -> Self::Elem {
        self.left.element(row, col) - self.right.element(row, col)
    }
}

/// Matrix product. Each cell is a fresh inner product over `left.ncols()`.
#[derive(Clone, Copy, Debug)]
pub struct Product<L, R> {
    left: L,
    right: R,
}

impl<L, R> Product<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
{
    pub fn new(left: L, right: R) -> Result<Self> {
        if left.ncols() != right.nrows() {
            return Err(LinalgError::mismatch(
                "product",
                left.shape(),
                right.shape(),
            ));
        }
        Ok(Self { left, right })
    }
}

impl<L, R> MatrixExpr for Product<L, R>
where
    L: MatrixExpr,
    R: MatrixExpr<Elem = L::Elem>,
{
    type Elem = L::Elem;

    fn nrows(&self) -> usize {
        self.left.nrows()
    }

    fn ncols(&self) -> usize {
        self.right.ncols()
    }

    fn element(&self, row: usize, col: usize) -> Self::Elem {
        let mut acc = <L::Elem as Zero>::zero();
        for k in 0..self.left.ncols() {
            acc += self.left.element(row, k) * self.right.element(k, col);
        }
        acc
    }
}

/// An expression multiplied by a scalar.
#[derive(Clone, Copy, Debug)]
pub struct Scale<E: MatrixExpr> {
    scalar: E::Elem,
    op: E,
}

impl<E: MatrixExpr> Scale<E> {
    pub fn new(scalar: E::Elem, op: E) -> Self {
        Self { scalar, op }
    }
}

impl<E: MatrixExpr> MatrixExpr for Scale<E> {
    type Elem = E::Elem;

    fn nrows(&self) -> usize {
        self.op.nrows()
    }

    fn ncols(&self) -> usize {
        self.op.ncols()
    }

    fn element(&self, row: usize, col: usize) -> Self::Elem {
        self.scalar * self.op.element(row, col)
    }
}

/// Transposed view: rows and columns of the inner expression swapped.
#[derive(Clone, Copy, Debug)]
pub struct Transpose<E> {
    op: E,
}

impl<E: MatrixExpr> Transpose<E> {
    pub fn new(op: E) -> Self {
        Self { op }
    }
}

impl<E: MatrixExpr> MatrixExpr for Transpose<E> {
    type Elem = E::Elem;

    fn nrows(&self) -> usize {
        self.op.ncols()
    }

    fn ncols(&self) -> usize {
        self.op.nrows()
    }

    fn element(&self, row: usize, col: usize) -> Self::Elem {
        self.op.element(col, row)
    }
}

const SIGNIFICANT_DIGITS: usize = 6;

/// Format a single value the way C's `%g` does: six significant digits,
/// trailing zeros dropped, exponent notation outside `1e-4 <= |v| < 1e6`.
///
/// ```
/// use lazy_linalg::math::format_value;
///
/// assert_eq!(format_value(1.0f64 / 3.0), "0.333333");
/// assert_eq!(format_value(1e20f64), "1e+20");
/// assert_eq!(format_value(2.5f32), "2.5");
/// ```
pub fn format_value<T: Scalar>(value: T) -> String {
    let v = ToPrimitive::to_f64(&value).unwrap_or(f64::NAN);
    if !v.is_finite() || v == 0.0 {
        let text = if v.is_nan() {
            "nan"
        } else if v.is_infinite() {
            "inf"
        } else {
            "0"
        };
        let sign = if v.is_sign_negative() { "-" } else { "" };
        return format!("{}{}", sign, text);
    }

    // The exponent is taken after rounding to the target precision.
    let sci = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, v);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..SIGNIFICANT_DIGITS as i32).contains(&exponent) {
        let decimals = (SIGNIFICANT_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, v)).to_string()
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Write `expr` row by row: every value followed by a space, a newline after
/// each row and one blank line after the last. Values go through
/// [`format_value`].
pub fn print<E, W>(expr: E, out: &mut W) -> io::Result<()>
where
    E: MatrixExpr,
    W: Write + ?Sized,
{
    for row in 0..expr.nrows() {
        for col in 0..expr.ncols() {
            write!(out, "{} ", format_value(expr.element(row, col)))?;
        }
        writeln!(out)?;
    }
    writeln!(out)
}

pub fn print_stdout<E>(expr: E) -> io::Result<()>
where
    E: MatrixExpr,
{
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    print(expr, &mut handle)
}

/// Render `expr` in the `print` format.
pub fn format_expr<E>(expr: E) -> String
where
    E: MatrixExpr,
{
    let mut buf = Vec::new();
    match print(expr, &mut buf) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        // Writing into a Vec<u8> does not fail.
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Matrix, Vector};

    #[test]
    fn test_product_shape_and_values() {
        let a = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let b = Matrix::new(3, 1, vec![1.0, 0.0, -1.0]).unwrap();
        let p = Product::new(&a, &b).unwrap();
        assert_eq!(p.shape(), (2, 1));
        assert_eq!(p.element(0, 0), -2.0);
        assert_eq!(p.element(1, 0), -2.0);
    }

    #[test]
    fn test_constructors_reject_mismatched_shapes() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(3, 2);
        assert!(matches!(
            Sum::new(&a, &b),
            Err(LinalgError::DimensionMismatch { operation: "sum", .. })
        ));
        assert!(Difference::new(&a, &b).is_err());
        assert!(Product::new(&a, &a).is_err());
        assert!(Product::new(&a, &b).is_ok());
    }

    #[test]
    fn test_transpose_swaps_shape() {
        let x = Vector::new(vec![1.0f32, 2.0, 3.0]);
        let t = Transpose::new(&x);
        assert_eq!(t.shape(), (1, 3));
        assert_eq!(t.element(0, 2), 3.0);
    }

    #[test]
    fn test_format_matches_print() {
        let x = Vector::new(vec![1.0f64, 2.0, 3.0]);
        let expr = Scale::new(2.0, Transpose::new(&x));
        let mut buf = Vec::new();
        print(expr, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2 4 6 \n\n");
        assert_eq!(format_expr(expr), "2 4 6 \n\n");
    }

    #[test]
    fn test_format_value_fixed_notation() {
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(0.1 + 0.2), "0.3");
        assert_eq!(format_value(0.0001), "0.0001");
        assert_eq!(format_value(123456.0), "123456");
        assert_eq!(format_value(-0.0), "-0");
    }

    #[test]
    fn test_format_value_exponent_notation() {
        assert_eq!(format_value(1234567.0), "1.23457e+06");
        assert_eq!(format_value(0.00001), "1e-05");
        assert_eq!(format_value(-2.5e-10), "-2.5e-10");
        assert_eq!(format_value(6.02e23), "6.02e+23");
        assert_eq!(format_value(1e100), "1e+100");
    }

    #[test]
    fn test_format_value_non_finite() {
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_value(f64::NAN), "nan");
        assert_eq!(format_value(f32::INFINITY), "inf");
    }

    #[test]
    fn test_empty_expression_prints_blank_line() {
        let m = Matrix::<f64>::zeros(0, 0);
        assert_eq!(format_expr(&m), "\n");
    }
}
