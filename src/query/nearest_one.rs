use crate::error::{KdTreeError, Result};
use crate::kdtree::{KdNode, KdTree, KdTreeRef};
use crate::neighbour::Neighbour;
use crate::point::{Axis, Point};
use crate::query::{check_origin, split_delta};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

pub(crate) fn nearest_one<'a, A, P, O>(
    root: Option<&'a KdNode<P>>,
    num_dims: Option<usize>,
    origin: &O,
) -> Result<Neighbour<A, &'a P>>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let root = root.ok_or(KdTreeError::EmptyTree)?;
    check_origin(num_dims, origin)?;

    let mut best = Neighbour {
        distance: root.datum.distance_to(origin)?,
        item: &root.datum,
    };
    nearest_one_recurse(root, origin, &mut best)?;

    #[cfg(feature = "tracing")]
    event!(
        Level::TRACE,
        query = "nearest_one",
        distance = ?best.distance,
        "Query complete"
    );

    Ok(best)
}

fn nearest_one_recurse<'a, A, P, O>(
    node: &'a KdNode<P>,
    origin: &O,
    best: &mut Neighbour<A, &'a P>,
) -> Result<()>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let distance = node.datum.distance_to(origin)?;
    // strict, so the first of several equidistant points is kept
    if distance < best.distance {
        *best = Neighbour {
            distance,
            item: &node.datum,
        };
    }

    let delta = split_delta(origin, &node.datum, node.axis);
    let [closer, further] = node.children_by(delta);

    if let Some(closer) = closer {
        nearest_one_recurse(closer, origin, best)?;
    }

    if let Some(further) = further {
        if delta.abs() < best.distance {
            nearest_one_recurse(further, origin, best)?;
        }
    }

    Ok(())
}

macro_rules! generate_nearest_one {
    ($kdtree:ident) => {
        /// Finds the point nearest to `origin`.
        ///
        /// If several points are equally near, the one the search reaches first is returned.
        /// `origin` may be any [`Point`] type with the same dimensionality as the tree.
        ///
        /// Fails with [`KdTreeError::EmptyTree`] on an empty tree, and with
        /// [`KdTreeError::Dimension`](crate::KdTreeError::Dimension) if `origin` has the wrong
        /// dimensionality.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use kdsearch::KdTree;
        ///
        /// let tree: KdTree<[f64; 2]> = KdTree::build([[0.0, 0.0], [5.0, 5.0], [9.0, 1.0]])?;
        ///
        /// assert_eq!(tree.nearest_one(&[6.0, 4.0])?, &[5.0, 5.0]);
        /// # Ok::<(), kdsearch::KdTreeError>(())
        /// ```
        pub fn nearest_one<O: Point<A> + ?Sized>(&self, origin: &O) -> Result<&P> {
            self.nearest_one_neighbour(origin).map(|n| n.item)
        }

        /// As [`nearest_one`](Self::nearest_one), but also returns the distance to the point.
        pub fn nearest_one_neighbour<O: Point<A> + ?Sized>(
            &self,
            origin: &O,
        ) -> Result<Neighbour<A, &P>> {
            nearest_one(self.root_node(), self.num_dims, origin)
        }
    };
}

impl<P: Point<A>, A: Axis> KdTree<P, A> {
    generate_nearest_one!(KdTree);
}

impl<P: Point<A>, A: Axis> KdTreeRef<'_, P, A> {
    generate_nearest_one!(KdTreeRef);
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::error::KdTreeError;
    use crate::kdtree::KdTree;
    use crate::point::Point;

    type AX = f64;

    #[test]
    fn can_query_nearest_one_item() {
        let content_to_add: [[AX; 4]; 8] = [
            [0.9, 0.0, 0.9, 0.0],
            [0.4, 0.5, 0.4, 0.5],
            [0.12, 0.3, 0.12, 0.3],
            [0.7, 0.2, 0.7, 0.2],
            [0.13, 0.4, 0.13, 0.4],
            [0.6, 0.3, 0.6, 0.3],
            [0.2, 0.7, 0.2, 0.7],
            [0.9, 0.1, 0.9, 0.1],
        ];
        let tree: KdTree<[AX; 4], AX> = KdTree::build(content_to_add).unwrap();

        let query = [0.51, 0.45, 0.51, 0.45];
        let nearest = tree.nearest_one_neighbour(&query).unwrap();

        assert_eq!(nearest.item, &[0.4, 0.5, 0.4, 0.5]);
        assert_eq!(nearest.distance, query.distance_to(&[0.4, 0.5, 0.4, 0.5]).unwrap());
    }

    #[test]
    fn equidistant_candidates_keep_the_first_found() {
        let tree: KdTree<[AX; 2], AX> =
            KdTree::build([[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [-1.0, -1.0]]).unwrap();

        assert_eq!(tree.root(), Some(&[1.0, 1.0]));
        assert_eq!(tree.nearest_one(&[0.5, 0.5]).unwrap(), &[1.0, 1.0]);
    }

    #[test]
    fn exact_match_is_at_distance_zero() {
        let tree: KdTree<[AX; 2], AX> =
            KdTree::build([[3.0, 1.0], [4.0, 1.0], [5.0, 9.0], [2.0, 6.0]]).unwrap();

        let nearest = tree.nearest_one_neighbour(&[5.0, 9.0]).unwrap();
        assert_eq!(nearest.item, &[5.0, 9.0]);
        assert_eq!(nearest.distance, 0.0);
    }

    #[test]
    fn origin_may_be_another_point_type() {
        let tree: KdTree<[AX; 3], AX> =
            KdTree::build([[1.0, 1.0, 1.0], [-4.0, 2.0, 0.0], [8.0, 0.0, -3.0]]).unwrap();

        let origin: Vec<AX> = vec![7.0, 1.0, -2.0];
        assert_eq!(tree.nearest_one(&origin).unwrap(), &[8.0, 0.0, -3.0]);
        assert_eq!(tree.nearest_one(&origin[..]).unwrap(), &[8.0, 0.0, -3.0]);
    }

    #[test]
    fn subtree_views_search_only_their_own_points() {
        let tree: KdTree<[AX; 1], AX> =
            KdTree::build([[1.0], [2.0], [3.0], [4.0], [5.0]]).unwrap();

        let left = tree.left().unwrap().unwrap();
        assert_eq!(left.nearest_one(&[10.0]).unwrap(), &[2.0]);

        let right = tree.right().unwrap().unwrap();
        assert_eq!(right.nearest_one(&[-10.0]).unwrap(), &[4.0]);
    }

    #[test]
    fn empty_tree_has_no_nearest() {
        let tree: KdTree<[AX; 2], AX> = KdTree::default();

        assert!(matches!(
            tree.nearest_one(&[0.0, 0.0]),
            Err(KdTreeError::EmptyTree)
        ));
    }

    #[test]
    fn rejects_origin_of_wrong_dimensionality() {
        let tree: KdTree<[AX; 2], AX> = KdTree::build([[0.0, 0.0], [1.0, 1.0]]).unwrap();

        assert!(matches!(
            tree.nearest_one(&[0.0, 0.0, 0.0]),
            Err(KdTreeError::Dimension {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn can_query_nearest_one_item_large_scale() {
        const TREE_SIZE: usize = 1_000;
        const NUM_QUERIES: usize = 100;

        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let content: Vec<[AX; 3]> = (0..TREE_SIZE)
            .map(|_| [rng.random(), rng.random(), rng.random()])
            .collect();
        let tree: KdTree<[AX; 3], AX> = KdTree::new_from_slice(&content).unwrap();

        for _ in 0..NUM_QUERIES {
            let query: [AX; 3] = [rng.random(), rng.random(), rng.random()];

            let expected = linear_search(&content, &query);
            let result = tree.nearest_one_neighbour(&query).unwrap();

            assert_eq!(result.distance, expected);
        }
    }

    fn linear_search(content: &[[AX; 3]], query: &[AX; 3]) -> AX {
        content
            .iter()
            .map(|p| p.distance_to(query).unwrap())
            .fold(AX::INFINITY, AX::min)
    }
}
