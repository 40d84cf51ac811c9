use nalgebra::Scalar;
use num_traits::{One, Zero};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// The scalar contract every kinematic and dynamic routine is written against.
///
/// Plain `f64`/`f32` implement it below. Any other scalar that provides these
/// operations (a forward-mode dual number, a tape variable, ...) can be dropped
/// in and derivatives flow through the whole pipeline unchanged.
///
/// `to_f64` returns the primal value. It is only used to validate inputs
/// (positivity checks, singularity checks) and never feeds back into a result.
pub trait Real:
    Scalar
    + Copy
    + PartialOrd
    + Zero
    + One
    + Add<Output = Self>
    + AddAssign
    + Sub<Output = Self>
    + SubAssign
    + Mul<Output = Self>
    + MulAssign
    + Div<Output = Self>
    + DivAssign
    + Neg<Output = Self>
{
    fn from_f64(value: f64) -> Self;
    fn to_f64(&self) -> f64;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn sqrt(self) -> Self;

    fn pi() -> Self {
        Self::from_f64(std::f64::consts::PI)
    }
}

macro_rules! impl_real {
    ($t:ty) => {
        impl Real for $t {
            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
            #[inline]
            fn to_f64(&self) -> f64 {
                *self as f64
            }
            #[inline]
            fn sin(self) -> Self {
                <$t>::sin(self)
            }
            #[inline]
            fn cos(self) -> Self {
                <$t>::cos(self)
            }
            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }
        }
    };
}

impl_real!(f64);
impl_real!(f32);
