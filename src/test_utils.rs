//! Exhaustive-scan reference queries and seeded random data, for checking trees against.

use std::array;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{KdTreeError, Result};
use crate::kdtree::KdTreeRef;
use crate::lat_lng::LatLng;
use crate::ordering::ProximityOrder;
use crate::point::{Axis, Point};

/// The point in `points` nearest to `origin`, the earliest winning ties.
pub fn nearest_one<'a, A, P, O>(points: &'a [P], origin: &O) -> Result<&'a P>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let order = ProximityOrder::new(origin);
    let mut best: Option<(A, &P)> = None;

    for p in points {
        let distance = order.distance(p)?;
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, p));
        }
    }

    best.map(|(_, p)| p).ok_or(KdTreeError::EmptyTree)
}

/// The `qty` points in `points` nearest to `origin`, nearest first.
pub fn nearest_n<'a, A, P, O>(points: &'a [P], origin: &O, qty: usize) -> Result<Vec<&'a P>>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let mut sorted: Vec<&P> = points.iter().collect();
    ProximityOrder::new(origin).sort(&mut sorted)?;
    sorted.truncate(qty);

    Ok(sorted)
}

/// Every point in `points` strictly closer than `radius` to `origin`, nearest first.
pub fn within_radius<'a, A, P, O>(points: &'a [P], origin: &O, radius: A) -> Result<Vec<&'a P>>
where
    A: Axis,
    P: Point<A>,
    O: Point<A> + ?Sized,
{
    let order = ProximityOrder::new(origin);

    let mut matching = Vec::new();
    for p in points {
        if order.distance(p)? < radius {
            matching.push(p);
        }
    }
    order.sort(&mut matching)?;

    Ok(matching)
}

/// Checks the shape every built tree has: a node with both children has subtrees whose
/// depths differ by at most one, and a node with a single child has a leaf there.
pub fn is_balanced<P, A: Axis>(tree: &KdTreeRef<'_, P, A>) -> bool {
    let (Ok(left), Ok(right)) = (tree.left(), tree.right()) else {
        return true;
    };

    match (left, right) {
        (Some(left), Some(right)) => {
            left.depth().abs_diff(right.depth()) <= 1 && is_balanced(&left) && is_balanced(&right)
        }
        (Some(only), None) | (None, Some(only)) => only.size() == 1,
        (None, None) => true,
    }
}

/// A random position with latitude and longitude both in `[0, 90)`.
pub fn rand_lat_lng<R: Rng>(rng: &mut R) -> LatLng {
    LatLng::new(rng.random_range(0.0..90.0), rng.random_range(0.0..90.0))
}

/// `size` random positions, reproducible from `seed`.
pub fn rand_lat_lngs(size: usize, seed: u64) -> Vec<LatLng> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size).map(|_| rand_lat_lng(&mut rng)).collect()
}

/// A random point with every co-ordinate in `[0, 1)`.
pub fn rand_point<R: Rng, const K: usize>(rng: &mut R) -> [f64; K] {
    array::from_fn(|_| rng.random())
}

/// `size` random points, reproducible from `seed`.
pub fn rand_points<const K: usize>(size: usize, seed: u64) -> Vec<[f64; K]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..size).map(|_| rand_point(&mut rng)).collect()
}
