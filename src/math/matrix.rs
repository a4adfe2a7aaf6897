use std::fmt;
use std::ops::{AddAssign, Index, IndexMut, SubAssign};

use crate::error::{LinalgError, Result};
use crate::math::expression::{format_expr, MatrixExpr, Scale, Transpose};
use crate::math::scalar::Scalar;
use crate::math::vector::Vector;

/// Dense row-major matrix owning `rows * cols` elements.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T> Matrix<T> {
    pub fn from_shape_vec(shape: (usize, usize), data: Vec<T>) -> Result<Self> {
        let (rows, cols) = shape;
        if data.len() != rows * cols {
            return Err(LinalgError::InvalidShape {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from row-major `data`.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        Self::from_shape_vec((rows, cols), data)
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "{}",
            LinalgError::IndexOutOfBounds {
                row,
                col,
                shape: self.shape(),
            }
        );
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row index out of bounds");
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn column(&self, col: usize) -> Vector<T>
    where
        T: Clone,
    {
        assert!(col < self.cols, "column index out of bounds");
        let mut values = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            values.push(self[(row, col)].clone());
        }
        Vector::new(values)
    }

    /// Exchange two rows in place.
    pub fn swap_rows(&mut self, first: usize, second: usize) {
        if first == second {
            return;
        }
        assert!(
            first < self.rows && second < self.rows,
            "row index out of bounds"
        );
        let a = first * self.cols;
        let b = second * self.cols;
        for col in 0..self.cols {
            self.data.swap(a + col, b + col);
        }
    }

    /// Reinterpret the buffer with a new shape holding the same element count.
    pub fn reshape(&mut self, rows: usize, cols: usize) -> Result<()> {
        if rows * cols != self.data.len() {
            return Err(LinalgError::InvalidShape {
                rows,
                cols,
                len: self.data.len(),
            });
        }
        self.rows = rows;
        self.cols = cols;
        Ok(())
    }

    pub fn map<U, F>(&self, mut f: F) -> Matrix<U>
    where
        F: FnMut(&T) -> U,
    {
        Matrix {
            data: self.data.iter().map(|v| f(v)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Scalar> Matrix<T> {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_elem(rows, cols, T::zero())
    }

    pub fn from_elem(rows: usize, cols: usize, value: T) -> Self {
        Matrix {
            data: vec![value; rows * cols],
            rows,
            cols,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut id = Self::zeros(n, n);
        for i in 0..n {
            id[(i, i)] = T::one();
        }
        id
    }

    /// Build a matrix from equally long rows.
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(LinalgError::InvalidShape {
                    rows: rows.len(),
                    cols,
                    len: data.len() + row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_shape_vec((rows.len(), cols), data)
    }

    /// Evaluate every cell of `expr` into a new matrix.
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: MatrixExpr<Elem = T>,
    {
        Self::materialize(&expr)
    }

    pub(crate) fn materialize<E>(expr: &E) -> Self
    where
        E: MatrixExpr<Elem = T> + ?Sized,
    {
        let (rows, cols) = expr.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                data.push(expr.element(row, col));
            }
        }
        Matrix { data, rows, cols }
    }

    /// Replace the contents with `expr`, taking its shape.
    ///
    /// The expression is fully evaluated before `self` is touched.
    pub fn assign<E>(&mut self, expr: E)
    where
        E: MatrixExpr<Elem = T>,
    {
        *self = Self::from_expr(expr);
    }

    pub fn transpose(&self) -> Transpose<&Self> {
        Transpose::new(self)
    }

    pub fn scale(&self, scalar: T) -> Scale<&Self> {
        Scale::new(scalar, self)
    }

    pub fn try_add_assign<E>(&mut self, expr: E) -> Result<()>
    where
        E: MatrixExpr<Elem = T>,
    {
        let rhs = self.checked_rhs("in-place sum", expr)?;
        for (dst, src) in self.data.iter_mut().zip(rhs.data) {
            *dst += src;
        }
        Ok(())
    }

    pub fn try_sub_assign<E>(&mut self, expr: E) -> Result<()>
    where
        E: MatrixExpr<Elem = T>,
    {
        let rhs = self.checked_rhs("in-place difference", expr)?;
        for (dst, src) in self.data.iter_mut().zip(rhs.data) {
            *dst -= src;
        }
        Ok(())
    }

    // Materialise first so `self` may appear inside `expr`.
    fn checked_rhs<E>(&self, operation: &'static str, expr: E) -> Result<Matrix<T>>
    where
        E: MatrixExpr<Elem = T>,
    {
        if expr.shape() != self.shape() {
            return Err(LinalgError::mismatch(operation, self.shape(), expr.shape()));
        }
        Ok(Self::from_expr(expr))
    }

    /// Largest absolute value, zero for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, v| acc.max(v.abs()))
    }
}

impl<'a, T: Scalar> MatrixExpr for &'a Matrix<T> {
    type Elem = T;

    #[inline]
    fn nrows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn element(&self, row: usize, col: usize) -> T {
        self[(row, col)]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let offset = self.offset(index.0, index.1);
        &self.data[offset]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(index.0, index.1);
        &mut self.data[offset]
    }
}

impl<T, E> AddAssign<E> for Matrix<T>
where
    T: Scalar,
    E: MatrixExpr<Elem = T>,
{
    fn add_assign(&mut self, rhs: E) {
        if let Err(err) = self.try_add_assign(rhs) {
            panic!("{}", err);
        }
    }
}

impl<T, E> SubAssign<E> for Matrix<T>
where
    T: Scalar,
    E: MatrixExpr<Elem = T>,
{
    fn sub_assign(&mut self, rhs: E) {
        if let Err(err) = self.try_sub_assign(rhs) {
            panic!("{}", err);
        }
    }
}

/// Moves the vector's buffer into a single-column matrix.
impl<T> From<Vector<T>> for Matrix<T> {
    fn from(value: Vector<T>) -> Self {
        let data: Vec<T> = value.into();
        let rows = data.len();
        Matrix {
            data,
            rows,
            cols: 1,
        }
    }
}

impl<T: Scalar> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_expr(self))
    }
}

#[cfg(feature = "ndarray")]
impl<T: Clone> From<ndarray::Array2<T>> for Matrix<T> {
    fn from(value: ndarray::Array2<T>) -> Self {
        let (rows, cols) = value.dim();
        Matrix {
            data: value.iter().cloned().collect(),
            rows,
            cols,
        }
    }
}

#[cfg(feature = "ndarray")]
impl<T: Clone> From<&Matrix<T>> for ndarray::Array2<T> {
    fn from(value: &Matrix<T>) -> Self {
        ndarray::Array2::from_shape_fn(value.shape(), |(i, j)| value[(i, j)].clone())
    }
}
