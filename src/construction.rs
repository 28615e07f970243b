use crate::error::{KdTreeError, Result};
use crate::kdtree::{KdNode, KdTree};
use crate::ordering::AxisOrder;
use crate::point::{Axis, Point};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

impl<P: Point<A>, A: Axis> KdTree<P, A> {
    /// Builds a balanced tree from a collection of points.
    ///
    /// At each level the points are stable-sorted on the split axis and the median becomes the
    /// node, so points with equal co-ordinates on that axis keep their input order. The split
    /// axis starts at 0 at the root and advances by one per level.
    ///
    /// An empty collection gives an empty tree. Fails with [`KdTreeError::InvalidInput`] if the
    /// points have zero dimensions or do not all share the same dimensionality.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kdsearch::KdTree;
    ///
    /// let tree: KdTree<[f64; 2]> = KdTree::build(vec![[1.0, 2.0], [3.0, 1.0], [2.0, 5.0]])?;
    ///
    /// assert_eq!(tree.size(), 3);
    /// assert_eq!(tree.root(), Some(&[2.0, 5.0]));
    /// # Ok::<(), kdsearch::KdTreeError>(())
    /// ```
    pub fn build<I: IntoIterator<Item = P>>(points: I) -> Result<Self> {
        let points: Vec<P> = points.into_iter().collect();

        let Some(first) = points.first() else {
            return Ok(Self::default());
        };
        let num_dims = first.dimensions();

        if num_dims == 0 {
            #[cfg(feature = "tracing")]
            event!(Level::WARN, "Rejected build: points have no dimensions");
            return Err(KdTreeError::InvalidInput(
                "points must have at least one dimension".to_string(),
            ));
        }

        if let Some((idx, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| p.dimensions() != num_dims)
        {
            #[cfg(feature = "tracing")]
            event!(
                Level::WARN,
                idx,
                expected = num_dims,
                found = p.dimensions(),
                "Rejected build: mixed dimensionality"
            );
            return Err(KdTreeError::InvalidInput(format!(
                "point {} has {} dimensions, expected {}",
                idx,
                p.dimensions(),
                num_dims
            )));
        }

        let root = build_subtree::<A, P>(points, AxisOrder::new(num_dims)?);
        let tree = Self::from_root(root, Some(num_dims));

        #[cfg(feature = "tracing")]
        event!(
            Level::DEBUG,
            size = tree.size(),
            num_dims,
            depth = tree.depth(),
            "Built KdTree"
        );

        Ok(tree)
    }

    /// Builds a tree from a copy of `points`, leaving the caller's slice untouched.
    ///
    /// See [`build`](KdTree::build) for the failure cases.
    pub fn new_from_slice(points: &[P]) -> Result<Self>
    where
        P: Clone,
    {
        Self::build(points.iter().cloned())
    }
}

impl<P: Point<A>, A: Axis> TryFrom<Vec<P>> for KdTree<P, A> {
    type Error = KdTreeError;

    fn try_from(points: Vec<P>) -> Result<Self> {
        Self::build(points)
    }
}

fn build_subtree<A: Axis, P: Point<A>>(
    mut points: Vec<P>,
    order: AxisOrder,
) -> Option<Box<KdNode<P>>> {
    match points.len() {
        0 => None,
        1 => points.pop().map(|p| Box::new(KdNode::leaf(p, order.axis()))),
        len => {
            // stable, so equal split values keep input order
            points.sort_by_key(|p| order.key::<A, P>(p));

            let mid = len / 2;
            let right = points.split_off(mid + 1);
            let datum = points.pop()?;
            let next = order.advance();

            Some(Box::new(KdNode {
                datum,
                axis: order.axis(),
                left: build_subtree::<A, P>(points, next),
                right: build_subtree::<A, P>(right, next),
            }))
        }
    }
}
