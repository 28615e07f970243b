use ordered_float::OrderedFloat;

use crate::error::{KdTreeError, Result};
use crate::kdtree::{KdNode, KdTree, KdTreeRef};
use crate::neighbour::Neighbour;
use crate::point::{Axis, Point};
use crate::query::{check_origin, split_delta};

#[cfg(feature = "tracing")]
use tracing::{event, Level};

pub(crate) fn within_radius<'a, A, P, O>(
    root: Option<&'a KdNode<P>>,
    num_dims: Option<usize>,
    origin: &O,
    radius: A,
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
    if radius.is_nan() || radius < A::zero() {
        return Err(KdTreeError::InvalidInput(format!(
            "radius must be a non-negative number, got {radius:?}"
        )));
    }

    let mut matching = Vec::new();
    within_recurse(root, origin, radius, &mut matching)?;

    // stable, so equidistant points stay in visit order
    matching.sort_by_key(|n| OrderedFloat(n.distance));

    #[cfg(feature = "tracing")]
    event!(
        Level::TRACE,
        query = "within_radius",
        radius = ?radius,
        found = matching.len(),
        "Query complete"
    );

    Ok(matching)
}

fn within_recurse<'a, A, P, O>(
    node: &'a KdNode<P>,
    origin: &O,
    radius: A,
    matching: &mut Vec<Neighbour<A, &'a P>>,
) -> Result<()>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let distance = node.datum.distance_to(origin)?;
    if distance < radius {
        matching.push(Neighbour {
            distance,
            item: &node.datum,
        });
    }

    let delta = split_delta(origin, &node.datum, node.axis);
    let [closer, further] = node.children_by(delta);

    if let Some(closer) = closer {
        within_recurse(closer, origin, radius, matching)?;
    }

    if let Some(further) = further {
        if delta.abs() < radius {
            within_recurse(further, origin, radius, matching)?;
        }
    }

    Ok(())
}

macro_rules! generate_within {
    ($kdtree:ident) => {
        /// Finds every point strictly closer than `radius` to `origin`, nearest first.
        ///
        /// Equidistant points come in the order the search reaches them. A radius of zero, or
        /// an empty tree, gives an empty result.
        ///
        /// Fails with [`KdTreeError::Dimension`](crate::KdTreeError::Dimension) if `origin` has
        /// the wrong dimensionality, and with [`KdTreeError::InvalidInput`] if `radius` is
        /// negative or NaN.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use kdsearch::KdTree;
        ///
        /// let tree: KdTree<[f64; 2]> = KdTree::build([[0.0, 0.0], [3.0, 4.0], [1.0, 1.0]])?;
        ///
        /// assert_eq!(tree.within_radius(&[0.0, 0.0], 5.0)?, vec![&[0.0, 0.0], &[1.0, 1.0]]);
        /// assert_eq!(tree.within_radius(&[0.0, 0.0], 5.01)?.len(), 3);
        /// # Ok::<(), kdsearch::KdTreeError>(())
        /// ```
        pub fn within_radius<O: Point<A> + ?Sized>(&self, origin: &O, radius: A) -> Result<Vec<&P>> {
            self.within_radius_neighbours(origin, radius)
                .map(|neighbours| neighbours.into_iter().map(|n| n.item).collect())
        }

        /// As [`within_radius`](Self::within_radius), but also returns the distance to each
        /// point.
        pub fn within_radius_neighbours<O: Point<A> + ?Sized>(
            &self,
            origin: &O,
            radius: A,
        ) -> Result<Vec<Neighbour<A, &P>>> {
            within_radius(self.root_node(), self.num_dims, origin, radius)
        }
    };
}

impl<P: Point<A>, A: Axis> KdTree<P, A> {
    generate_within!(KdTree);
}

impl<P: Point<A>, A: Axis> KdTreeRef<'_, P, A> {
    generate_within!(KdTreeRef);
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use crate::error::KdTreeError;
    use crate::kdtree::KdTree;
    use crate::point::Point;

    type AX = f64;

    fn line_tree() -> KdTree<[AX; 1], AX> {
        KdTree::build([[4.0], [-1.0], [2.0], [0.0], [7.0], [1.0]]).unwrap()
    }

    #[rstest]
    #[case(0.0, vec![])]
    #[case(0.5, vec![[0.0]])]
    #[case(1.0, vec![[0.0]])]
    #[case(1.5, vec![[0.0], [1.0], [-1.0]])]
    #[case(4.5, vec![[0.0], [1.0], [-1.0], [2.0], [4.0]])]
    #[case(100.0, vec![[0.0], [1.0], [-1.0], [2.0], [4.0], [7.0]])]
    fn returns_points_strictly_inside_radius(#[case] radius: AX, #[case] expected: Vec<[AX; 1]>) {
        let tree = line_tree();

        let result: Vec<[AX; 1]> = tree
            .within_radius(&[0.0], radius)
            .unwrap()
            .into_iter()
            .copied()
            .collect();

        assert_eq!(result, expected);
    }

    #[test]
    fn empty_tree_gives_empty_result() {
        let tree: KdTree<[AX; 2], AX> = KdTree::default();

        assert!(tree.within_radius(&[0.0, 0.0], 5.0).unwrap().is_empty());
        assert!(tree.within_radius(&[0.0], -1.0).unwrap().is_empty());
    }

    #[rstest]
    #[case(-0.1)]
    #[case(AX::NAN)]
    #[case(AX::NEG_INFINITY)]
    fn bad_radius_is_rejected(#[case] radius: AX) {
        let tree = line_tree();

        assert!(matches!(
            tree.within_radius(&[0.0], radius),
            Err(KdTreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn rejects_origin_of_wrong_dimensionality() {
        let tree = line_tree();

        assert!(matches!(
            tree.within_radius(&[0.0, 0.0], 1.0),
            Err(KdTreeError::Dimension {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn infinite_radius_returns_everything() {
        let tree = line_tree();

        let result = tree.within_radius_neighbours(&[3.0], AX::INFINITY).unwrap();

        assert_eq!(result.len(), tree.size());
        assert!(result.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn can_query_items_within_radius_large_scale() {
        const TREE_SIZE: usize = 1_000;
        const NUM_QUERIES: usize = 50;

        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let content: Vec<[AX; 2]> = (0..TREE_SIZE)
            .map(|_| [rng.random_range(0.0..90.0), rng.random_range(0.0..90.0)])
            .collect();
        let tree: KdTree<[AX; 2], AX> = KdTree::new_from_slice(&content).unwrap();

        for _ in 0..NUM_QUERIES {
            let query: [AX; 2] = [rng.random_range(0.0..90.0), rng.random_range(0.0..90.0)];
            let radius = rng.random_range(1.0..20.0);

            let mut expected: Vec<AX> = content
                .iter()
                .map(|p| p.distance_to(&query).unwrap())
                .filter(|&d| d < radius)
                .collect();
            expected.sort_by(|a, b| a.total_cmp(b));

            let result: Vec<AX> = tree
                .within_radius_neighbours(&query, radius)
                .unwrap()
                .into_iter()
                .map(|n| n.distance)
                .collect();

            assert_eq!(result, expected);
        }
    }
}
