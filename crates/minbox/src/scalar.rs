//! The compute-type contract and generic vector arithmetic.
//!
//! The search runs over a `ComputeScalar` distinct from the caller's `f64`
//! input type. The minimum-area/volume guarantee of the O(n) calipers loop
//! holds only when comparisons and division are exact (`EXACT = true`);
//! under `f64` the result is a silent accuracy tradeoff the caller opts
//! into. All intermediate quantities are sums, products and quotients of
//! input coordinates; square roots appear only at the final conversion
//! back to `f64`.

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

use nalgebra::{Vector2, Vector3};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

/// Arithmetic used internally by the searches.
///
/// Ops are by value; implementors are expected to be cheap to clone
/// (`f64`) or acceptably so (`BigRational`).
pub trait ComputeScalar:
    Clone
    + Debug
    + PartialOrd
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Whether comparisons, multiplication and division are exact.
    const EXACT: bool;

    /// Lossless for finite `x` on exact implementations; non-finite input
    /// maps to zero.
    fn from_f64(x: f64) -> Self;

    fn to_f64(&self) -> f64;

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn abs(&self) -> Self {
        if *self < Self::zero() {
            -self.clone()
        } else {
            self.clone()
        }
    }
}

impl ComputeScalar for f64 {
    const EXACT: bool = false;

    #[inline]
    fn from_f64(x: f64) -> Self {
        if x.is_finite() {
            x
        } else {
            0.0
        }
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }
}

impl ComputeScalar for BigRational {
    const EXACT: bool = true;

    #[inline]
    fn from_f64(x: f64) -> Self {
        BigRational::from_float(x).unwrap_or_else(Zero::zero)
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        ToPrimitive::to_f64(self).unwrap_or(f64::NAN)
    }
}

// Component-wise vector helpers. Written out explicitly so the only bound
// needed on `S` is `ComputeScalar`, rather than nalgebra's closed-op
// aliases.

#[inline]
pub fn vec2<S: ComputeScalar>(v: &Vector2<f64>) -> Vector2<S> {
    Vector2::new(S::from_f64(v.x), S::from_f64(v.y))
}

#[inline]
pub fn vec3<S: ComputeScalar>(v: &Vector3<f64>) -> Vector3<S> {
    Vector3::new(S::from_f64(v.x), S::from_f64(v.y), S::from_f64(v.z))
}

#[inline]
pub fn dot2<S: ComputeScalar>(a: &Vector2<S>, b: &Vector2<S>) -> S {
    a.x.clone() * b.x.clone() + a.y.clone() * b.y.clone()
}

#[inline]
pub fn sub2<S: ComputeScalar>(a: &Vector2<S>, b: &Vector2<S>) -> Vector2<S> {
    Vector2::new(a.x.clone() - b.x.clone(), a.y.clone() - b.y.clone())
}

#[inline]
pub fn add2<S: ComputeScalar>(a: &Vector2<S>, b: &Vector2<S>) -> Vector2<S> {
    Vector2::new(a.x.clone() + b.x.clone(), a.y.clone() + b.y.clone())
}

#[inline]
pub fn scale2<S: ComputeScalar>(v: &Vector2<S>, s: &S) -> Vector2<S> {
    Vector2::new(v.x.clone() * s.clone(), v.y.clone() * s.clone())
}

/// +90° rotation in the plane.
#[inline]
pub fn perp2<S: ComputeScalar>(v: &Vector2<S>) -> Vector2<S> {
    Vector2::new(-v.y.clone(), v.x.clone())
}

#[inline]
pub fn dot3<S: ComputeScalar>(a: &Vector3<S>, b: &Vector3<S>) -> S {
    a.x.clone() * b.x.clone() + a.y.clone() * b.y.clone() + a.z.clone() * b.z.clone()
}

#[inline]
pub fn sub3<S: ComputeScalar>(a: &Vector3<S>, b: &Vector3<S>) -> Vector3<S> {
    Vector3::new(
        a.x.clone() - b.x.clone(),
        a.y.clone() - b.y.clone(),
        a.z.clone() - b.z.clone(),
    )
}

#[inline]
pub fn add3<S: ComputeScalar>(a: &Vector3<S>, b: &Vector3<S>) -> Vector3<S> {
    Vector3::new(
        a.x.clone() + b.x.clone(),
        a.y.clone() + b.y.clone(),
        a.z.clone() + b.z.clone(),
    )
}

#[inline]
pub fn scale3<S: ComputeScalar>(v: &Vector3<S>, s: &S) -> Vector3<S> {
    Vector3::new(
        v.x.clone() * s.clone(),
        v.y.clone() * s.clone(),
        v.z.clone() * s.clone(),
    )
}

#[inline]
pub fn cross3<S: ComputeScalar>(a: &Vector3<S>, b: &Vector3<S>) -> Vector3<S> {
    Vector3::new(
        a.y.clone() * b.z.clone() - a.z.clone() * b.y.clone(),
        a.z.clone() * b.x.clone() - a.x.clone() * b.z.clone(),
        a.x.clone() * b.y.clone() - a.y.clone() * b.x.clone(),
    )
}
