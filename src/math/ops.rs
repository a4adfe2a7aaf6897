//! Operator sugar for building expression nodes.
//!
//! `+`, `-` and `*` between expressions build `Sum`, `Difference` and
//! `Product` nodes and panic on incompatible shapes. Use
//! `MatrixExpr::try_add` and friends to get the `DimensionMismatch` error
//! instead. `*` with an `f32`/`f64` on either side builds a `Scale` node.

use std::ops::{Add, Mul, Sub};

use crate::error::Result;
use crate::math::expression::{Difference, MatrixExpr, Product, Scale, Sum, Transpose};
use crate::math::matrix::Matrix;
use crate::math::scalar::Scalar;
use crate::math::vector::Vector;

fn expect_shape<N>(node: Result<N>) -> N {
    match node {
        Ok(node) => node,
        Err(err) => panic!("{}", err),
    }
}

macro_rules! impl_expr_ops {
    ($ty:ty, [$($gen:tt)*]) => {
        impl<$($gen)*, Rhs> Add<Rhs> for $ty
        where
            Self: MatrixExpr,
            Rhs: MatrixExpr<Elem = <Self as MatrixExpr>::Elem>,
        {
            type Output = Sum<Self, Rhs>;

            fn add(self, rhs: Rhs) -> Self::Output {
                expect_shape(Sum::new(self, rhs))
            }
        }

        impl<$($gen)*, Rhs> Sub<Rhs> for $ty
        where
            Self: MatrixExpr,
            Rhs: MatrixExpr<Elem = <Self as MatrixExpr>::Elem>,
        {
            type Output = Difference<Self, Rhs>;

            fn sub(self, rhs: Rhs) -> Self::Output {
                expect_shape(Difference::new(self, rhs))
            }
        }

        impl<$($gen)*, Rhs> Mul<Rhs> for $ty
        where
            Self: MatrixExpr,
            Rhs: MatrixExpr<Elem = <Self as MatrixExpr>::Elem>,
        {
            type Output = Product<Self, Rhs>;

            fn mul(self, rhs: Rhs) -> Self::Output {
                expect_shape(Product::new(self, rhs))
            }
        }

        impl_scalar_ops!($ty, [$($gen)*], f32);
        impl_scalar_ops!($ty, [$($gen)*], f64);
    };
}

macro_rules! impl_scalar_ops {
    ($ty:ty, [$($gen:tt)*], $scalar:ty) => {
        impl<$($gen)*> Mul<$scalar> for $ty
        where
            Self: MatrixExpr<Elem = $scalar>,
        {
            type Output = Scale<Self>;

            fn mul(self, rhs: $scalar) -> Self::Output {
                Scale::new(rhs, self)
            }
        }

        impl<$($gen)*> Mul<$ty> for $scalar
        where
            $ty: MatrixExpr<Elem = $scalar>,
        {
            type Output = Scale<$ty>;

            fn mul(self, rhs: $ty) -> Self::Output {
                Scale::new(self, rhs)
            }
        }
    };
}

macro_rules! impl_leaf_ops {
    ($leaf:ident) => {
        impl<'a, T, Rhs> Add<Rhs> for &'a $leaf<T>
        where
            T: Scalar,
            Rhs: MatrixExpr<Elem = T>,
        {
            type Output = Sum<Self, Rhs>;

            fn add(self, rhs: Rhs) -> Self::Output {
                expect_shape(Sum::new(self, rhs))
            }
        }

        impl<'a, T, Rhs> Sub<Rhs> for &'a $leaf<T>
        where
            T: Scalar,
            Rhs: MatrixExpr<Elem = T>,
        {
            type Output = Difference<Self, Rhs>;

            fn sub(self, rhs: Rhs) -> Self::Output {
                expect_shape(Difference::new(self, rhs))
            }
        }

        impl<'a, T, Rhs> Mul<Rhs> for &'a $leaf<T>
        where
            T: Scalar,
            Rhs: MatrixExpr<Elem = T>,
        {
            type Output = Product<Self, Rhs>;

            fn mul(self, rhs: Rhs) -> Self::Output {
                expect_shape(Product::new(self, rhs))
            }
        }

        impl_leaf_scalar_ops!($leaf, f32);
        impl_leaf_scalar_ops!($leaf, f64);
    };
}

// Spelled out per scalar so `2.0 * &m` resolves on the element type alone.
macro_rules! impl_leaf_scalar_ops {
    ($leaf:ident, $scalar:ty) => {
        impl<'a> Mul<$scalar> for &'a $leaf<$scalar> {
            type Output = Scale<Self>;

            fn mul(self, rhs: $scalar) -> Self::Output {
                Scale::new(rhs, self)
            }
        }

        impl<'a> Mul<&'a $leaf<$scalar>> for $scalar {
            type Output = Scale<&'a $leaf<$scalar>>;

            fn mul(self, rhs: &'a $leaf<$scalar>) -> Self::Output {
                Scale::new(self, rhs)
            }
        }
    };
}

impl_leaf_ops!(Matrix);
impl_leaf_ops!(Vector);

impl_expr_ops!(Sum<L, R>, [L, R]);
impl_expr_ops!(Difference<L, R>, [L, R]);
impl_expr_ops!(Product<L, R>, [L, R]);
impl_expr_ops!(Scale<E>, [E: MatrixExpr]);
impl_expr_ops!(Transpose<E>, [E]);
