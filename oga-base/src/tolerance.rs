//! General-purpose floating-point tolerance.
use crate::cgmath64::*;
use cgmath::AbsDiffEq;
use std::fmt::Debug;

/// General tolerance used outside the kernel's own geometric epsilons.
pub const TOLERANCE: f64 = 1.0e-6;

/// `TOLERANCE`, squared; useful when comparing squared distances.
pub const TOLERANCE2: f64 = TOLERANCE * TOLERANCE;

/// Defines a tolerance shared across the whole workspace.
pub trait Tolerance: AbsDiffEq<Epsilon = f64> + Debug {
    /// The "distance" between `self` and `other` is less than `TOLERANCE`.
    fn near(&self, other: &Self) -> bool { self.abs_diff_eq(other, TOLERANCE) }
    /// The "distance" between `self` and `other` is less than `TOLERANCE2`.
    fn near2(&self, other: &Self) -> bool { self.abs_diff_eq(other, TOLERANCE2) }
}

impl<T: AbsDiffEq<Epsilon = f64> + Debug> Tolerance for T {}

/// Things with a well-defined origin, e.g. `f64` or any of the cgmath vectors.
pub trait Origin: Tolerance + Zero {
    /// `self` is near the origin.
    fn so_small(&self) -> bool { self.near(&Self::zero()) }
    /// `self` is near the origin, to square-order tolerance.
    fn so_small2(&self) -> bool { self.near2(&Self::zero()) }
}

impl<T: Tolerance + Zero> Origin for T {}

/// Asserts that `left.near(&right)`.
#[macro_export]
macro_rules! assert_near {
    ($left: expr, $right: expr $(,)?) => {{
        let (left, right) = ($left, $right);
        assert!(
            $crate::tolerance::Tolerance::near(&left, &right),
            "assertion failed: `left` is near `right`\nleft: {left:?},\nright: {right:?}",
        )
    }};
}

/// Asserts that `left.near2(&right)`.
#[macro_export]
macro_rules! assert_near2 {
    ($left: expr, $right: expr $(,)?) => {{
        let (left, right) = ($left, $right);
        assert!(
            $crate::tolerance::Tolerance::near2(&left, &right),
            "assertion failed: `left` is near `right`\nleft: {left:?},\nright: {right:?}",
        )
    }};
}
