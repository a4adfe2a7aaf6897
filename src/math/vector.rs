use std::fmt;
use std::iter::FromIterator;
use std::ops::{AddAssign, Index, IndexMut, SubAssign};
use std::slice::{Iter, IterMut};

use crate::error::{LinalgError, Result};
use crate::math::expression::{format_expr, MatrixExpr, Scale, Transpose};
use crate::math::matrix::Matrix;
use crate::math::scalar::Scalar;

/// Dense column vector. Behaves as an `n x 1` matrix in expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T> Vector<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn nrows(&self) -> usize {
        self.data.len()
    }

    pub fn ncols(&self) -> usize {
        1
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.data.len(), 1)
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    pub fn map<U, F>(&self, mut f: F) -> Vector<U>
    where
        F: FnMut(&T) -> U,
    {
        Vector::new(self.data.iter().map(|v| f(v)).collect())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.clone()
    }
}

impl<T> Vector<T>
where
    T: Clone,
{
    pub fn from_slice(values: &[T]) -> Self {
        Vector::new(values.to_vec())
    }

    pub fn from_elem(len: usize, value: T) -> Self {
        Vector::new(vec![value; len])
    }
}

impl<T: Scalar> Vector<T> {
    pub fn zeros(len: usize) -> Self {
        Vector::from_elem(len, T::zero())
    }

    /// Copy a single-column expression into a new vector.
    pub fn from_expr<E>(expr: E) -> Result<Self>
    where
        E: MatrixExpr<Elem = T>,
    {
        if expr.ncols() != 1 {
            return Err(LinalgError::mismatch(
                "vector materialisation",
                expr.shape(),
                (expr.nrows(), 1),
            ));
        }
        Ok((0..expr.nrows()).map(|row| expr.element(row, 0)).collect())
    }

    /// Replace the contents with a single-column `expr`.
    pub fn assign<E>(&mut self, expr: E) -> Result<()>
    where
        E: MatrixExpr<Elem = T>,
    {
        *self = Self::from_expr(expr)?;
        Ok(())
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
        for (dst, src) in self.data.iter_mut().zip(rhs) {
            *dst += src;
        }
        Ok(())
    }

    pub fn try_sub_assign<E>(&mut self, expr: E) -> Result<()>
    where
        E: MatrixExpr<Elem = T>,
    {
        let rhs = self.checked_rhs("in-place difference", expr)?;
        for (dst, src) in self.data.iter_mut().zip(rhs) {
            *dst -= src;
        }
        Ok(())
    }

    fn checked_rhs<E>(&self, operation: &'static str, expr: E) -> Result<Vec<T>>
    where
        E: MatrixExpr<Elem = T>,
    {
        if expr.shape() != self.shape() {
            return Err(LinalgError::mismatch(operation, self.shape(), expr.shape()));
        }
        Ok(Matrix::from_expr(expr).into_vec())
    }

    pub fn dot(&self, other: &Vector<T>) -> T {
        assert_eq!(
            self.len(),
            other.len(),
            "Dot product requires equal length vectors"
        );
        self.iter()
            .zip(other.iter())
            .fold(T::zero(), |acc, (a, b)| acc + *a * *b)
    }

    /// Euclidean norm.
    pub fn norm(&self) -> T {
        self.dot(self).sqrt()
    }
}

impl<'a, T: Scalar> MatrixExpr for &'a Vector<T> {
    type Elem = T;

    #[inline]
    fn nrows(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn ncols(&self) -> usize {
        1
    }

    #[inline]
    fn element(&self, row: usize, col: usize) -> T {
        self[(row, col)]
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(value: Vec<T>) -> Self {
        Vector::new(value)
    }
}

impl<T> From<Vector<T>> for Vec<T> {
    fn from(value: Vector<T>) -> Self {
        value.data
    }
}

/// Moves the buffer of a single-column matrix into a vector.
impl<T> TryFrom<Matrix<T>> for Vector<T> {
    type Error = LinalgError;

    fn try_from(value: Matrix<T>) -> Result<Self> {
        if value.ncols() != 1 {
            return Err(LinalgError::mismatch(
                "vector conversion",
                value.shape(),
                (value.nrows(), 1),
            ));
        }
        Ok(Vector::new(value.into_vec()))
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Vector::new(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}

impl<T> Index<(usize, usize)> for Vector<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        assert_eq!(index.1, 0, "vector has a single column");
        &self.data[index.0]
    }
}

impl<T> IndexMut<(usize, usize)> for Vector<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        assert_eq!(index.1, 0, "vector has a single column");
        &mut self.data[index.0]
    }
}

impl<T, E> AddAssign<E> for Vector<T>
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

impl<T, E> SubAssign<E> for Vector<T>
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

impl<T: Scalar> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_expr(self))
    }
}
