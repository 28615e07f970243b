//! Nearest-neighbour, k-nearest and radius queries, available on both
//! [`KdTree`](crate::KdTree) and [`KdTreeRef`](crate::KdTreeRef).
//!
//! All three are branch-and-bound searches: the child on the same side of the split as the
//! query origin is searched first, and the other child only if the splitting plane lies within
//! the current search bound.

use crate::error::{KdTreeError, Result};
use crate::point::{check_dims, Axis, Point};

mod nearest_n;
mod nearest_one;
mod within;

/// Offset from the node's datum to the origin along the node's split axis.
#[inline]
pub(crate) fn split_delta<A: Axis, P: Point<A>, O: Point<A> + ?Sized>(
    origin: &O,
    datum: &P,
    axis: usize,
) -> A {
    origin.location_data()[axis] - datum.location_data()[axis]
}

/// Fails unless the tree holds points of the same dimensionality as `origin`.
#[inline]
pub(crate) fn check_origin<A: Axis, O: Point<A> + ?Sized>(
    num_dims: Option<usize>,
    origin: &O,
) -> Result<()> {
    let num_dims = num_dims.ok_or(KdTreeError::EmptyTree)?;
    check_dims(num_dims, origin.dimensions())
}
