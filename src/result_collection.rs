use crate::neighbour::{Candidate, Neighbour};
use crate::point::Axis;
use sorted_vec::SortedVec;

/// Retains the best `max_qty` candidates offered to it, nearest first.
///
/// Candidates are ranked by distance and then by the order they were offered in, so an
/// equidistant latecomer never displaces a candidate already held.
#[derive(Debug)]
pub(crate) struct BestNeighbours<A: Axis, T> {
    max_qty: usize,
    offered: usize,
    items: SortedVec<Candidate<A, T>>,
}

impl<A: Axis, T> BestNeighbours<A, T> {
    pub(crate) fn new_with_capacity(max_qty: usize) -> Self {
        Self {
            max_qty,
            offered: 0,
            items: SortedVec::with_capacity(max_qty),
        }
    }

    /// Offers a candidate, evicting the current worst if the collection is full and the
    /// candidate beats it. Does nothing otherwise.
    pub(crate) fn add(&mut self, distance: A, item: T) {
        let entry = Candidate {
            neighbour: Neighbour { distance, item },
            visit: self.offered,
        };
        self.offered += 1;

        if self.items.len() < self.max_qty {
            self.items.insert(entry);
        } else if self.items.last().is_some_and(|worst| entry < *worst) {
            self.items.pop();
            self.items.insert(entry);
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= self.max_qty
    }

    #[inline]
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn best(&self) -> Option<&Neighbour<A, T>> {
        self.items.first().map(|c| &c.neighbour)
    }

    #[inline]
    pub(crate) fn worst(&self) -> Option<&Neighbour<A, T>> {
        self.items.last().map(|c| &c.neighbour)
    }

    /// Distance a new candidate has to beat to be retained: the worst retained distance once
    /// full, and infinity before that.
    #[inline]
    pub(crate) fn max_dist(&self) -> A {
        if self.is_full() {
            self.worst().map_or(A::infinity(), |n| n.distance)
        } else {
            A::infinity()
        }
    }

    pub(crate) fn into_sorted_vec(self) -> Vec<Neighbour<A, T>> {
        self.items
            .into_vec()
            .into_iter()
            .map(|c| c.neighbour)
            .collect()
    }
}
