use crate::error::{KdTreeError, Result};
use crate::kdtree::{KdNode, KdTree, KdTreeRef};
use crate::neighbour::Neighbour;
use crate::point::{Axis, Point};
use crate::query::{check_origin, split_delta};
use crate::result_collection::BestNeighbours;

#[cfg(feature = "tracing")]
use tracing::{event, Level};

pub(crate) fn nearest_n<'a, A, P, O>(
    root: Option<&'a KdNode<P>>,
    num_dims: Option<usize>,
    origin: &O,
    qty: usize,
) -> Result<Vec<Neighbour<A, &'a P>>>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let Some(root) = root else {
        return Ok(Vec::new());
    };
    check_origin(num_dims, origin)?;
    if qty == 0 {
        return Err(KdTreeError::InvalidInput(
            "number of neighbours must be at least 1".to_string(),
        ));
    }

    let mut best = BestNeighbours::new_with_capacity(qty);
    nearest_n_recurse(root, origin, &mut best)?;

    #[cfg(feature = "tracing")]
    event!(
        Level::TRACE,
        query = "nearest_n",
        qty,
        found = best.len(),
        nearest = ?best.best().map(|n| n.distance),
        "Query complete"
    );

    Ok(best.into_sorted_vec())
}

fn nearest_n_recurse<'a, A, P, O>(
    node: &'a KdNode<P>,
    origin: &O,
    best: &mut BestNeighbours<A, &'a P>,
) -> Result<()>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    best.add(node.datum.distance_to(origin)?, &node.datum);

    let delta = split_delta(origin, &node.datum, node.axis);
    let [closer, further] = node.children_by(delta);

    if let Some(closer) = closer {
        nearest_n_recurse(closer, origin, best)?;
    }

    if let Some(further) = further {
        if !best.is_full() || delta.abs() < best.max_dist() {
            nearest_n_recurse(further, origin, best)?;
        }
    }

    Ok(())
}

macro_rules! generate_nearest_n {
    ($kdtree:ident) => {
        /// Finds up to `qty` points nearest to `origin`, nearest first.
        ///
        /// Fewer than `qty` points are returned only when the tree holds fewer. When several
        /// points are equally near, those the search reaches first come first. An empty tree
        /// gives an empty result.
        ///
        /// Fails with [`KdTreeError::Dimension`](crate::KdTreeError::Dimension) if `origin` has
        /// the wrong dimensionality, and with [`KdTreeError::InvalidInput`] if `qty` is 0.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use kdsearch::KdTree;
        ///
        /// let tree: KdTree<[f64; 2]> = KdTree::build([[0.0, 0.0], [5.0, 5.0], [9.0, 1.0]])?;
        ///
        /// let nearest = tree.nearest_n(&[6.0, 3.0], 2)?;
        /// assert_eq!(nearest, vec![&[5.0, 5.0], &[9.0, 1.0]]);
        /// # Ok::<(), kdsearch::KdTreeError>(())
        /// ```
        pub fn nearest_n<O: Point<A> + ?Sized>(&self, origin: &O, qty: usize) -> Result<Vec<&P>> {
            self.nearest_n_neighbours(origin, qty)
                .map(|neighbours| neighbours.into_iter().map(|n| n.item).collect())
        }

        /// As [`nearest_n`](Self::nearest_n), but also returns the distance to each point.
        pub fn nearest_n_neighbours<O: Point<A> + ?Sized>(
            &self,
            origin: &O,
            qty: usize,
        ) -> Result<Vec<Neighbour<A, &P>>> {
            nearest_n(self.root_node(), self.num_dims, origin, qty)
        }
    };
}

impl<P: Point<A>, A: Axis> KdTree<P, A> {
    generate_nearest_n!(KdTree);
}

impl<P: Point<A>, A: Axis> KdTreeRef<'_, P, A> {
    generate_nearest_n!(KdTreeRef);
}
