//! Element type accepted by the storage types and expression nodes.

use std::fmt::{Debug, Display};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use num_traits::Float;

/// Floating-point scalar usable as a matrix element.
///
/// The solver divides by pivots, so only real floating-point types qualify.
pub trait Scalar:
    Float
    + Display
    + Debug
    + Default
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + 'static
{
    /// Convert a tolerance or constant given as `f64`.
    fn from_f64(value: f64) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

impl Scalar for f32 {
    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}
