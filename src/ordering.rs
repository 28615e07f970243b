//! Orderings over points: by a single co-ordinate while building, and by distance from an
//! origin when ranking query results.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::marker::PhantomData;

use crate::error::{KdTreeError, Result};
use crate::point::{check_dims, Axis, Point};

/// Orders points by their co-ordinate on one axis, cycling through the axes as the tree
/// gets deeper.
///
/// # Examples
///
/// ```rust
/// use kdsearch::AxisOrder;
/// use std::cmp::Ordering;
///
/// let order = AxisOrder::new(2)?;
/// assert_eq!(order.compare(&[1.0, 9.0], &[2.0, 0.0])?, Ordering::Less);
///
/// let order = order.advance();
/// assert_eq!(order.axis(), 1);
/// assert_eq!(order.compare(&[1.0, 9.0], &[2.0, 0.0])?, Ordering::Greater);
///
/// assert_eq!(order.advance().axis(), 0);
/// assert!(AxisOrder::new(0).is_err());
/// # Ok::<(), kdsearch::KdTreeError>(())
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisOrder {
    num_dims: usize,
    axis: usize,
}

impl AxisOrder {
    /// Creates an order over `num_dims`-dimensional points, starting on axis 0.
    ///
    /// Fails with [`KdTreeError::InvalidInput`] if `num_dims` is zero.
    pub fn new(num_dims: usize) -> Result<Self> {
        Self::with_axis(num_dims, 0)
    }

    /// Creates an order over `num_dims`-dimensional points, starting on `axis`.
    ///
    /// Fails with [`KdTreeError::InvalidInput`] if `num_dims` is zero, or with
    /// [`KdTreeError::Dimension`] if `axis` is not below `num_dims`.
    pub fn with_axis(num_dims: usize, axis: usize) -> Result<Self> {
        if num_dims == 0 {
            return Err(KdTreeError::InvalidInput(
                "an axis order needs at least one dimension".to_string(),
            ));
        }
        if axis >= num_dims {
            return Err(KdTreeError::Dimension {
                expected: num_dims,
                found: axis,
            });
        }

        Ok(Self { num_dims, axis })
    }

    /// The axis currently compared on.
    #[inline]
    pub fn axis(&self) -> usize {
        self.axis
    }

    /// The dimensionality of the points being compared.
    #[inline]
    pub fn num_dims(&self) -> usize {
        self.num_dims
    }

    /// Returns a new order comparing on the next axis, wrapping back to 0 after the last.
    #[inline]
    pub fn advance(&self) -> Self {
        Self {
            num_dims: self.num_dims,
            axis: (self.axis + 1) % self.num_dims,
        }
    }

    /// Compares `a` and `b` by their co-ordinate on the current axis, ascending.
    ///
    /// Co-ordinates are totally ordered, with NaN after every number. Fails with
    /// [`KdTreeError::Dimension`] if either point has no co-ordinate on the current axis.
    #[inline]
    pub fn compare<A, P, Q>(&self, a: &P, b: &Q) -> Result<Ordering>
    where
        A: Axis,
        P: Point<A> + ?Sized,
        Q: Point<A> + ?Sized,
    {
        let a = a.component_at(self.axis)?;
        let b = b.component_at(self.axis)?;

        Ok(OrderedFloat(a).cmp(&OrderedFloat(b)))
    }

    /// Sort key for points already known to have `num_dims` co-ordinates.
    #[inline]
    pub(crate) fn key<A: Axis, P: Point<A> + ?Sized>(&self, p: &P) -> OrderedFloat<A> {
        OrderedFloat(p.location_data()[self.axis])
    }
}

/// Orders points by their Euclidean distance from a fixed origin, nearest first.
///
/// # Examples
///
/// ```rust
/// use kdsearch::ProximityOrder;
/// use std::cmp::Ordering;
///
/// let origin = [0.0, 0.0];
/// let order = ProximityOrder::new(&origin);
///
/// assert_eq!(order.compare(&[1.0, 1.0], &[0.0, 3.0]).unwrap(), Ordering::Less);
/// assert!(order.compare(&[1.0, 1.0], &[0.0, 3.0, 1.0]).is_err());
/// ```
#[derive(Debug)]
pub struct ProximityOrder<'a, A: Axis, O: Point<A> + ?Sized> {
    origin: &'a O,
    phantom: PhantomData<A>,
}

impl<A: Axis, O: Point<A> + ?Sized> Clone for ProximityOrder<'_, A, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Axis, O: Point<A> + ?Sized> Copy for ProximityOrder<'_, A, O> {}

impl<'a, A: Axis, O: Point<A> + ?Sized> ProximityOrder<'a, A, O> {
    /// Creates an order ranking points by their distance from `origin`.
    pub fn new(origin: &'a O) -> Self {
        Self {
            origin,
            phantom: PhantomData,
        }
    }

    /// The point distances are measured from.
    pub fn origin(&self) -> &'a O {
        self.origin
    }

    /// Distance from the origin to `p`.
    ///
    /// Fails with [`KdTreeError::Dimension`](crate::KdTreeError::Dimension) if `p` has a
    /// different dimensionality to the origin.
    #[inline]
    pub fn distance<P: Point<A> + ?Sized>(&self, p: &P) -> Result<A> {
        check_dims(self.origin.dimensions(), p.dimensions())?;
        p.distance_to(self.origin)
    }

    /// Compares `a` and `b` by their distance from the origin, nearest first.
    ///
    /// Fails with [`KdTreeError::Dimension`](crate::KdTreeError::Dimension) unless the origin
    /// and both operands share a dimensionality.
    pub fn compare<P, Q>(&self, a: &P, b: &Q) -> Result<Ordering>
    where
        P: Point<A> + ?Sized,
        Q: Point<A> + ?Sized,
    {
        check_dims(a.dimensions(), b.dimensions())?;
        let dist_a = self.distance(a)?;
        let dist_b = self.distance(b)?;

        Ok(OrderedFloat(dist_a).cmp(&OrderedFloat(dist_b)))
    }

    /// Stable-sorts `points` nearest-first.
    ///
    /// Equidistant points keep their relative order. Fails, leaving `points` untouched, if any
    /// point's dimensionality differs from the origin's.
    pub fn sort<P: Point<A>>(&self, points: &mut [P]) -> Result<()> {
        for p in points.iter() {
            check_dims(self.origin.dimensions(), p.dimensions())?;
        }
        points.sort_by_cached_key(|p| {
            OrderedFloat(self.distance(p).unwrap_or_else(|_| A::infinity()))
        });

        Ok(())
    }
}
