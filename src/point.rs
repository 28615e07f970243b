//! The capability that every value stored in, or used to query, a [`KdTree`](crate::KdTree)
//! must provide.

use num_traits::float::FloatCore;
use std::fmt::Debug;

use crate::error::{KdTreeError, Result};

/// Axis trait represents the traits that must be implemented
/// by the type used for the co-ordinates of a [`Point`]. This will be [`f64`] or [`f32`].
pub trait Axis: FloatCore + Default + Debug + Copy + Sync + Send + std::ops::AddAssign {
    /// returns the square root of `self`
    fn sqrt(self) -> Self;
}

impl Axis for f64 {
    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
}

impl Axis for f32 {
    #[inline]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }
}

/// A value with a fixed number of real-valued co-ordinates.
///
/// Only [`location_data`](Point::location_data) needs implementing; dimensionality, component
/// access and Euclidean distance are all derived from it. The query origin handed to a tree may
/// be of a different `Point` type than the tree's contents, so long as the dimensionality agrees.
///
/// # Examples
///
/// ```rust
/// use kdsearch::Point;
///
/// struct Station {
///     name: &'static str,
///     position: [f64; 2],
/// }
///
/// impl Point for Station {
///     fn location_data(&self) -> &[f64] {
///         &self.position
///     }
/// }
///
/// let station = Station { name: "Depot", position: [3.0, 4.0] };
///
/// assert_eq!(station.dimensions(), 2);
/// assert_eq!(station.component_at(1).unwrap(), 4.0);
/// assert_eq!(station.distance_to(&[0.0, 0.0]).unwrap(), 5.0);
/// ```
pub trait Point<A: Axis = f64> {
    /// The co-ordinates of this point, e.g. `[3.0, 4.0, 2.0]` for x = 3, y = 4, z = 2.
    fn location_data(&self) -> &[A];

    /// The number of co-ordinates. Always equal to `location_data().len()`.
    #[inline]
    fn dimensions(&self) -> usize {
        self.location_data().len()
    }

    /// The co-ordinate on axis `dim`: for a point (x, y), `0` gives x and `1` gives y.
    ///
    /// Fails with [`KdTreeError::Dimension`] if `dim` is not below [`dimensions`](Point::dimensions).
    #[inline]
    fn component_at(&self, dim: usize) -> Result<A> {
        self.location_data()
            .get(dim)
            .copied()
            .ok_or(KdTreeError::Dimension {
                expected: self.dimensions(),
                found: dim,
            })
    }

    /// The Euclidean distance to `other`: the square root of the sum of the squared
    /// per-axis differences.
    ///
    /// Fails with [`KdTreeError::Dimension`] if the two points differ in dimensionality.
    fn distance_to<O: Point<A> + ?Sized>(&self, other: &O) -> Result<A> {
        check_dims(self.dimensions(), other.dimensions())?;

        let dist_sq = self
            .location_data()
            .iter()
            .zip(other.location_data().iter())
            .map(|(&a, &b)| (a - b) * (a - b))
            .fold(A::zero(), std::ops::Add::add);

        Ok(dist_sq.sqrt())
    }
}

impl<A: Axis, const K: usize> Point<A> for [A; K] {
    #[inline]
    fn location_data(&self) -> &[A] {
        self
    }
}

impl<A: Axis> Point<A> for Vec<A> {
    #[inline]
    fn location_data(&self) -> &[A] {
        self.as_slice()
    }
}

impl<A: Axis> Point<A> for [A] {
    #[inline]
    fn location_data(&self) -> &[A] {
        self
    }
}

impl<A: Axis, P: Point<A> + ?Sized> Point<A> for &P {
    #[inline]
    fn location_data(&self) -> &[A] {
        (**self).location_data()
    }
}

#[inline]
pub(crate) fn check_dims(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(KdTreeError::Dimension { expected, found })
    }
}
