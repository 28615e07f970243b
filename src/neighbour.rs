//! Query results that carry their distance from the query origin.

use crate::point::Axis;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;

/// A stored point matched by a query, paired with its distance from the query origin.
///
/// The `*_neighbour(s)` query methods return these with `item` borrowing into the tree.
/// Neighbours order by `distance` alone; equality also needs the same `item`.
#[derive(Debug, Copy, Clone)]
pub struct Neighbour<A, T> {
    /// Euclidean distance from the query origin
    pub distance: A,
    /// The matched point
    pub item: T,
}

impl<A: PartialOrd, T> PartialOrd for Neighbour<A, T>
where
    T: PartialEq,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

impl<A: PartialEq, T: PartialEq> PartialEq for Neighbour<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.item == other.item
    }
}

impl<A, T> From<Neighbour<A, T>> for (A, T) {
    fn from(elem: Neighbour<A, T>) -> Self {
        (elem.distance, elem.item)
    }
}

/// A [`Neighbour`] tagged with the order in which the query visited it.
///
/// Totally ordered by distance, then by visit order, so that of two equidistant candidates the
/// one found first always ranks better.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Candidate<A, T> {
    pub(crate) neighbour: Neighbour<A, T>,
    pub(crate) visit: usize,
}

impl<A: Axis, T> Candidate<A, T> {
    #[inline]
    fn key(&self) -> (OrderedFloat<A>, usize) {
        (OrderedFloat(self.neighbour.distance), self.visit)
    }
}

impl<A: Axis, T> Ord for Candidate<A, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<A: Axis, T> PartialOrd for Candidate<A, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A: Axis, T> Eq for Candidate<A, T> {}

impl<A: Axis, T> PartialEq for Candidate<A, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
