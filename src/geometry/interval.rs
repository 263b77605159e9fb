//! Outward-rounded interval arithmetic.
//!
//! Every operation returns an interval guaranteed to contain the exact real
//! result for any choice of operands inside the input intervals. The
//! intersection code carries all of its arithmetic through these intervals
//! and tests tolerances against whole intervals instead of rounded scalars.

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

// Bound-level directed rounding. Each helper computes the round-to-nearest
// result plus its exact residual (two-sum for addition, FMA residual for
// multiplication, division and square root) and steps one ULP outward only
// when the residual shows that rounding moved the result inward. Exact
// operations therefore keep exact bounds. Subnormal and overflowing results
// are widened unconditionally; the residual is not exact down there.

// Exact residual of s = a + b rounded to nearest (Knuth two-sum).
#[inline]
fn sum_err(a: f64, b: f64, s: f64) -> f64 {
    let bv = s - a;
    let av = s - bv;
    (a - av) + (b - bv)
}

#[inline]
fn add_down(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s == f64::INFINITY && a.is_finite() && b.is_finite() {
        return f64::MAX;
    }
    if sum_err(a, b, s) < 0.0 {
        s.next_down()
    } else {
        s
    }
}

#[inline]
fn add_up(a: f64, b: f64) -> f64 {
    let s = a + b;
    if s == f64::NEG_INFINITY && a.is_finite() && b.is_finite() {
        return f64::MIN;
    }
    if sum_err(a, b, s) > 0.0 {
        s.next_up()
    } else {
        s
    }
}

#[inline]
fn mul_down(a: f64, b: f64) -> f64 {
    let p = a * b;
    if a == 0.0 || b == 0.0 || p.is_nan() {
        return p;
    }
    if p == f64::INFINITY {
        return f64::MAX;
    }
    if p == 0.0 || p.is_subnormal() {
        return p.next_down();
    }
    if a.mul_add(b, -p) < 0.0 {
        p.next_down()
    } else {
        p
    }
}

#[inline]
fn mul_up(a: f64, b: f64) -> f64 {
    let p = a * b;
    if a == 0.0 || b == 0.0 || p.is_nan() {
        return p;
    }
    if p == f64::NEG_INFINITY {
        return f64::MIN;
    }
    if p == 0.0 || p.is_subnormal() {
        return p.next_up();
    }
    if a.mul_add(b, -p) > 0.0 {
        p.next_up()
    } else {
        p
    }
}

#[inline]
fn div_down(a: f64, b: f64) -> f64 {
    let q = a / b;
    if a == 0.0 || q.is_nan() {
        return q;
    }
    if q == f64::INFINITY {
        return f64::MAX;
    }
    if q == 0.0 || q.is_subnormal() {
        return q.next_down();
    }
    // r = q*b - a, exact; the true quotient is below q iff r and b agree in sign.
    let r = q.mul_add(b, -a);
    if r != 0.0 && (r > 0.0) == (b > 0.0) {
        q.next_down()
    } else {
        q
    }
}

#[inline]
fn div_up(a: f64, b: f64) -> f64 {
    let q = a / b;
    if a == 0.0 || q.is_nan() {
        return q;
    }
    if q == f64::NEG_INFINITY {
        return f64::MIN;
    }
    if q == 0.0 || q.is_subnormal() {
        return q.next_up();
    }
    let r = q.mul_add(b, -a);
    if r != 0.0 && (r > 0.0) != (b > 0.0) {
        q.next_up()
    } else {
        q
    }
}

#[inline]
fn sqrt_down(x: f64) -> f64 {
    let s = x.sqrt();
    if s.mul_add(s, -x) > 0.0 {
        s.next_down()
    } else {
        s
    }
}

#[inline]
fn sqrt_up(x: f64) -> f64 {
    let s = x.sqrt();
    if s.mul_add(s, -x) < 0.0 {
        s.next_up()
    } else {
        s
    }
}

/// Closed real interval `[lo, hi]` with outward-rounded arithmetic.
///
/// Invariant: `min() <= max()`, except for the empty interval, which is only
/// produced by [`Interval::intersection`] of disjoint intervals. Arithmetic
/// assumes non-empty operands.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub const EMPTY: Interval = Interval {
        lo: f64::INFINITY,
        hi: f64::NEG_INFINITY,
    };

    /// Interval spanning `lo..=hi`; the bounds may be given in either order.
    pub fn new(lo: f64, hi: f64) -> Self {
        if lo <= hi {
            Interval { lo, hi }
        } else {
            Interval { lo: hi, hi: lo }
        }
    }

    pub fn min(&self) -> f64 {
        self.lo
    }

    pub fn max(&self) -> f64 {
        self.hi
    }

    pub fn extent(&self) -> f64 {
        self.hi - self.lo
    }

    /// Midpoint, the best scalar estimate when a single answer is needed.
    pub fn middle(&self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    pub fn is_singular(&self) -> bool {
        self.lo == self.hi
    }

    pub fn is_empty(&self) -> bool {
        self.lo > self.hi
    }

    /// Subset test; a scalar is treated as a singular interval.
    pub fn contains<T: Into<Interval>>(&self, other: T) -> bool {
        let other = other.into();
        self.lo <= other.lo && other.hi <= self.hi
    }

    pub fn intersects(&self, other: Interval) -> bool {
        self.lo <= other.hi && other.lo <= self.hi
    }

    /// Common region of `a` and `b`; empty when they are disjoint.
    pub fn intersection(a: Interval, b: Interval) -> Interval {
        let lo = a.lo.max(b.lo);
        let hi = a.hi.min(b.hi);
        if lo <= hi {
            Interval { lo, hi }
        } else {
            Interval::EMPTY
        }
    }

    /// True iff the interval intersects `[-epsilon, epsilon]`, i.e. the value
    /// cannot be told apart from zero at this tolerance.
    pub fn is_small(&self, epsilon: f64) -> bool {
        self.intersects(Interval::new(-epsilon, epsilon))
    }

    // Certainly-ordered predicates: true only when the relation holds for
    // every pair of values drawn from the two intervals. Not a total order,
    // hence named methods instead of PartialOrd.

    pub fn certainly_lt(&self, other: Interval) -> bool {
        self.hi < other.lo
    }

    pub fn certainly_le(&self, other: Interval) -> bool {
        self.hi <= other.lo
    }

    pub fn certainly_gt(&self, other: Interval) -> bool {
        self.lo > other.hi
    }

    pub fn certainly_ge(&self, other: Interval) -> bool {
        self.lo >= other.hi
    }

    /// Interval of squares; an interval spanning zero squares to `[0, ..]`,
    /// never to a negative lower bound.
    pub fn square(self) -> Interval {
        if self.lo >= 0.0 {
            Interval {
                lo: mul_down(self.lo, self.lo),
                hi: mul_up(self.hi, self.hi),
            }
        } else if self.hi <= 0.0 {
            Interval {
                lo: mul_down(self.hi, self.hi),
                hi: mul_up(self.lo, self.lo),
            }
        } else {
            let m = (-self.lo).max(self.hi);
            Interval {
                lo: 0.0,
                hi: mul_up(m, m),
            }
        }
    }

    /// Square root; the part of the interval below zero is discarded.
    pub fn sqrt(self) -> Interval {
        if self.hi < 0.0 {
            return Interval::EMPTY;
        }
        Interval {
            lo: sqrt_down(self.lo.max(0.0)),
            hi: sqrt_up(self.hi),
        }
    }

    pub fn abs(self) -> Interval {
        if self.lo >= 0.0 {
            self
        } else if self.hi <= 0.0 {
            Interval {
                lo: -self.hi,
                hi: -self.lo,
            }
        } else {
            Interval {
                lo: 0.0,
                hi: (-self.lo).max(self.hi),
            }
        }
    }
}

impl From<f64> for Interval {
    fn from(v: f64) -> Self {
        Interval { lo: v, hi: v }
    }
}

/// Pointwise minimum of an interval and an interval or scalar.
pub fn min<T: Into<Interval>>(a: Interval, b: T) -> Interval {
    let b = b.into();
    Interval {
        lo: a.lo.min(b.lo),
        hi: a.hi.min(b.hi),
    }
}

/// Pointwise maximum of an interval and an interval or scalar.
pub fn max<T: Into<Interval>>(a: Interval, b: T) -> Interval {
    let b = b.into();
    Interval {
        lo: a.lo.max(b.lo),
        hi: a.hi.max(b.hi),
    }
}

/// Euclidean norm `sqrt(dx^2 + dy^2)` in interval form.
pub fn l2(dx: Interval, dy: Interval) -> Interval {
    (dx.square() + dy.square()).sqrt()
}

impl Add for Interval {
    type Output = Interval;
    fn add(self, rhs: Interval) -> Interval {
        Interval {
            lo: add_down(self.lo, rhs.lo),
            hi: add_up(self.hi, rhs.hi),
        }
    }
}

impl Sub for Interval {
    type Output = Interval;
    fn sub(self, rhs: Interval) -> Interval {
        Interval {
            lo: add_down(self.lo, -rhs.hi),
            hi: add_up(self.hi, -rhs.lo),
        }
    }
}

impl Mul for Interval {
    type Output = Interval;
    fn mul(self, rhs: Interval) -> Interval {
        let (a, b) = (self.lo, self.hi);
        let (c, d) = (rhs.lo, rhs.hi);
        Interval {
            lo: mul_down(a, c)
                .min(mul_down(a, d))
                .min(mul_down(b, c))
                .min(mul_down(b, d)),
            hi: mul_up(a, c)
                .max(mul_up(a, d))
                .max(mul_up(b, c))
                .max(mul_up(b, d)),
        }
    }
}

impl Div for Interval {
    type Output = Interval;
    fn div(self, rhs: Interval) -> Interval {
        if rhs.lo <= 0.0 && 0.0 <= rhs.hi {
            // Divisor straddles zero; the quotient is unbounded.
            return Interval {
                lo: f64::NEG_INFINITY,
                hi: f64::INFINITY,
            };
        }
        let (a, b) = (self.lo, self.hi);
        let (c, d) = (rhs.lo, rhs.hi);
        Interval {
            lo: div_down(a, c)
                .min(div_down(a, d))
                .min(div_down(b, c))
                .min(div_down(b, d)),
            hi: div_up(a, c)
                .max(div_up(a, d))
                .max(div_up(b, c))
                .max(div_up(b, d)),
        }
    }
}

impl Add<f64> for Interval {
    type Output = Interval;
    fn add(self, rhs: f64) -> Interval {
        self + Interval::from(rhs)
    }
}

impl Sub<f64> for Interval {
    type Output = Interval;
    fn sub(self, rhs: f64) -> Interval {
        self - Interval::from(rhs)
    }
}

impl Mul<f64> for Interval {
    type Output = Interval;
    fn mul(self, rhs: f64) -> Interval {
        self * Interval::from(rhs)
    }
}

impl Div<f64> for Interval {
    type Output = Interval;
    fn div(self, rhs: f64) -> Interval {
        self / Interval::from(rhs)
    }
}

impl Add<Interval> for f64 {
    type Output = Interval;
    fn add(self, rhs: Interval) -> Interval {
        Interval::from(self) + rhs
    }
}

impl Sub<Interval> for f64 {
    type Output = Interval;
    fn sub(self, rhs: Interval) -> Interval {
        Interval::from(self) - rhs
    }
}

impl Mul<Interval> for f64 {
    type Output = Interval;
    fn mul(self, rhs: Interval) -> Interval {
        Interval::from(self) * rhs
    }
}

impl Div<Interval> for f64 {
    type Output = Interval;
    fn div(self, rhs: Interval) -> Interval {
        Interval::from(self) / rhs
    }
}

impl AddAssign for Interval {
    fn add_assign(&mut self, rhs: Interval) {
        *self = *self + rhs;
    }
}

impl SubAssign for Interval {
    fn sub_assign(&mut self, rhs: Interval) {
        *self = *self - rhs;
    }
}

impl MulAssign for Interval {
    fn mul_assign(&mut self, rhs: Interval) {
        *self = *self * rhs;
    }
}

impl DivAssign for Interval {
    fn div_assign(&mut self, rhs: Interval) {
        *self = *self / rhs;
    }
}

impl AddAssign<f64> for Interval {
    fn add_assign(&mut self, rhs: f64) {
        *self = *self + rhs;
    }
}

impl SubAssign<f64> for Interval {
    fn sub_assign(&mut self, rhs: f64) {
        *self = *self - rhs;
    }
}

impl MulAssign<f64> for Interval {
    fn mul_assign(&mut self, rhs: f64) {
        *self = *self * rhs;
    }
}

impl DivAssign<f64> for Interval {
    fn div_assign(&mut self, rhs: f64) {
        *self = *self / rhs;
    }
}
