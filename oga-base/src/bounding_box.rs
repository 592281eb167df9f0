//! Axis-aligned bounding boxes.
use cgmath::*;
use serde::*;
use std::ops::Index;

/// An axis-aligned bounding box over a cgmath point/vector type.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct BoundingBox<V>(V, V);

/// Types that can serve as the corner of a `BoundingBox`.
pub trait Bounded<S> {
    /// the result of subtraction
    type Vector;
    #[doc(hidden)]
    fn infinity() -> Self;
    #[doc(hidden)]
    fn neg_infinity() -> Self;
    #[doc(hidden)]
    fn max(&self, other: &Self) -> Self;
    #[doc(hidden)]
    fn min(&self, other: &Self) -> Self;
    #[doc(hidden)]
    fn max_component(one: Self::Vector) -> S;
    #[doc(hidden)]
    fn diagonal(self, other: Self) -> Self::Vector;
}

macro_rules! pr2 {
    ($a: expr, $b: expr) => {
        $b
    };
}
macro_rules! impl_bounded {
    ($typename: ident, $vectortype: ident, $($num: expr),*) => {
        impl<S: BaseFloat> Bounded<S> for $typename<S> {
            type Vector = $vectortype<S>;
            fn infinity() -> $typename<S> { $typename::new($(pr2!($num, S::infinity())),*) }
            fn neg_infinity() -> $typename<S> { $typename::new($(pr2!($num, S::neg_infinity())),*) }
            fn max(&self, other: &Self) -> Self {
                $typename::new($(if self[$num] < other[$num] { other[$num] } else { self[$num] }),*)
            }
            fn min(&self, other: &Self) -> Self {
                $typename::new($(if self[$num] > other[$num] { other[$num] } else { self[$num] }),*)
            }
            fn max_component(one: Self::Vector) -> S {
                let mut max = S::neg_infinity();
                $(if max < one[$num] { max = one[$num] })*
                max
            }
            fn diagonal(self, other: Self) -> Self::Vector { self - other }
        }
    };
}
impl_bounded!(Vector2, Vector2, 0, 1);
impl_bounded!(Point2, Vector2, 0, 1);
impl_bounded!(Vector3, Vector3, 0, 1, 2);
impl_bounded!(Point3, Vector3, 0, 1, 2);

impl<F, V> Default for BoundingBox<V>
where
    F: BaseFloat,
    V: MetricSpace<Metric = F> + Index<usize, Output = F> + Bounded<F> + Copy,
{
    fn default() -> Self { BoundingBox(V::infinity(), V::neg_infinity()) }
}

impl<F, V> BoundingBox<V>
where
    F: BaseFloat,
    V: MetricSpace<Metric = F> + Index<usize, Output = F> + Bounded<F> + Copy,
{
    /// Creates an empty bounding box.
    pub fn new() -> Self { Self::default() }

    /// Adds a point. NaN components leave the box untouched.
    pub fn push(&mut self, point: &V) {
        self.0 = self.0.min(point);
        self.1 = self.1.max(point);
    }

    /// An empty box (constructed via `new()` and never pushed to) has `min > max`.
    pub fn is_empty(&self) -> bool { self.0[0] > self.1[0] }

    /// The maximum corner.
    pub fn max(&self) -> &V { &self.1 }
    /// The minimum corner.
    pub fn min(&self) -> &V { &self.0 }
    /// `max - min`.
    pub fn diagonal(&self) -> V::Vector { self.1.diagonal(self.0) }
    /// Largest component of the diagonal.
    pub fn size(&self) -> F { V::max_component(self.diagonal()) }

    /// Squared Euclidean gap between `self` and `other`: `0` if the boxes
    /// overlap or touch, otherwise the squared distance between their
    /// nearest faces. Squared (rather than `sqrt`ed) so callers comparing
    /// against a `btol` threshold can square the threshold instead, the
    /// same pattern `tolerance::TOLERANCE2` uses. Used by the direct-cut
    /// classifier's `btol`-scaled bounding-box rejection (spec §4.8 step 3a).
    pub fn gap_squared(&self, other: &Self) -> F {
        let n = std::mem::size_of::<V>() / std::mem::size_of::<F>();
        let zero = self.0[0] - self.0[0];
        (0..n).fold(zero, |sum, i| {
            let gap = if self.1[i] < other.0[i] {
                other.0[i] - self.1[i]
            } else if other.1[i] < self.0[i] {
                self.0[i] - other.1[i]
            } else {
                zero
            };
            sum + gap * gap
        })
    }
}

impl<'a, F, V> FromIterator<&'a V> for BoundingBox<V>
where
    F: BaseFloat,
    V: MetricSpace<Metric = F> + Copy + Index<usize, Output = F> + Bounded<F>,
{
    fn from_iter<I: IntoIterator<Item = &'a V>>(iter: I) -> BoundingBox<V> {
        let mut bdd_box = BoundingBox::new();
        iter.into_iter().for_each(|pt| bdd_box.push(pt));
        bdd_box
    }
}

impl<F, V> FromIterator<V> for BoundingBox<V>
where
    F: BaseFloat,
    V: MetricSpace<Metric = F> + Copy + Index<usize, Output = F> + Bounded<F>,
{
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> BoundingBox<V> {
        let mut bdd_box = BoundingBox::new();
        iter.into_iter().for_each(|pt| bdd_box.push(&pt));
        bdd_box
    }
}

/// Builds the bounding box of `points` after applying a rigid transform to each
/// one first, per spec §4.5 ("used when a mesh is rigidly moved").
pub fn transformed_bounding_box(points: &[Point3<f64>], transform: Matrix3<f64>) -> BoundingBox<Point3<f64>> {
    points
        .iter()
        .map(|p| Point3::from_vec(transform * p.to_vec()))
        .collect()
}
