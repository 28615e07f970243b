//! Immutable k-d tree, built once from a fixed set of points by
//! [`KdTree::build`](crate::KdTree::build) and queried many times afterwards.
//!
//! Each node of the tree owns a single point and splits the points beneath it on one axis:
//! points to the left are no greater on that axis, points to the right no smaller. The split
//! axis advances by one, wrapping around, at each level of the tree.
//!
//! [`KdTree`] owns its nodes. [`KdTreeRef`] is a borrowed view onto a subtree of a `KdTree`,
//! obtained through [`KdTree::left`] and [`KdTree::right`]; it offers the same accessors and
//! queries without copying any points.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::OnceLock;

use crate::error::{KdTreeError, Result};
use crate::point::Axis;

#[derive(Clone, Debug)]
pub(crate) struct KdNode<P> {
    pub(crate) datum: P,
    pub(crate) axis: usize,
    pub(crate) left: Option<Box<KdNode<P>>>,
    pub(crate) right: Option<Box<KdNode<P>>>,
}

impl<P> KdNode<P> {
    pub(crate) fn leaf(datum: P, axis: usize) -> Self {
        Self {
            datum,
            axis,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn left(&self) -> Option<&KdNode<P>> {
        self.left.as_deref()
    }

    #[inline]
    pub(crate) fn right(&self) -> Option<&KdNode<P>> {
        self.right.as_deref()
    }

    /// `[closer, further]` children for a query whose offset from this node's datum along the
    /// split axis is `delta`.
    #[inline]
    pub(crate) fn children_by<A: Axis>(&self, delta: A) -> [Option<&KdNode<P>>; 2] {
        if delta < A::zero() {
            [self.left(), self.right()]
        } else {
            [self.right(), self.left()]
        }
    }

    fn size(&self) -> usize {
        1 + self.left().map_or(0, KdNode::size) + self.right().map_or(0, KdNode::size)
    }

    fn depth(&self) -> usize {
        1 + self
            .left()
            .map_or(0, KdNode::depth)
            .max(self.right().map_or(0, KdNode::depth))
    }
}

/// Immutable k-d tree
///
/// Generic over the point type `P` it stores, and the co-ordinate type `A` (`f64` unless
/// stated otherwise) of those points. `P` will usually implement [`Point<A>`](crate::Point).
///
/// Two trees are equal if they contain the same points, regardless of how those points are
/// arranged within each tree. `PartialEq`, `Eq` and `Hash` are only implemented when
/// `P: Eq + Hash`, which holds for [`LatLng`](crate::LatLng) and integer arrays but not for
/// `[f64; K]` or `Vec<f64>`. Trees of plain float arrays have no equality; store a point type
/// with a total order on its co-ordinates instead.
///
/// # Examples
///
/// ```rust
/// use kdsearch::{KdTree, LatLng};
///
/// let points = [LatLng::new(51.5, -0.1), LatLng::new(48.9, 2.4), LatLng::new(52.5, 13.4)];
/// let mut reversed = points;
/// reversed.reverse();
///
/// let a: KdTree<LatLng> = KdTree::build(points)?;
/// let b: KdTree<LatLng> = KdTree::build(reversed)?;
/// assert_eq!(a, b);
/// # Ok::<(), kdsearch::KdTreeError>(())
/// ```
#[derive(Debug)]
pub struct KdTree<P, A: Axis = f64> {
    pub(crate) root: Option<Box<KdNode<P>>>,
    pub(crate) num_dims: Option<usize>,
    size: OnceLock<usize>,
    depth: OnceLock<usize>,
    phantom: PhantomData<A>,
}

/// A borrowed view onto a subtree of a [`KdTree`].
///
/// Usually obtained via [`KdTree::left`] or [`KdTree::right`]. Compares and hashes by content
/// like [`KdTree`], under the same `P: Eq + Hash` bound.
#[derive(Debug)]
pub struct KdTreeRef<'a, P, A: Axis = f64> {
    pub(crate) root: Option<&'a KdNode<P>>,
    pub(crate) num_dims: Option<usize>,
    size: OnceLock<usize>,
    depth: OnceLock<usize>,
    phantom: PhantomData<A>,
}

impl<P, A: Axis> Default for KdTree<P, A> {
    /// An empty tree.
    fn default() -> Self {
        Self::from_root(None, None)
    }
}

impl<P: Clone, A: Axis> Clone for KdTree<P, A> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            num_dims: self.num_dims,
            size: self.size.clone(),
            depth: self.depth.clone(),
            phantom: PhantomData,
        }
    }
}

impl<P, A: Axis> Clone for KdTreeRef<'_, P, A> {
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            num_dims: self.num_dims,
            size: self.size.clone(),
            depth: self.depth.clone(),
            phantom: PhantomData,
        }
    }
}

impl<P, A: Axis> KdTree<P, A> {
    pub(crate) fn from_root(root: Option<Box<KdNode<P>>>, num_dims: Option<usize>) -> Self {
        Self {
            root,
            num_dims,
            size: OnceLock::new(),
            depth: OnceLock::new(),
            phantom: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn root_node(&self) -> Option<&KdNode<P>> {
        self.root.as_deref()
    }

    /// A view onto the whole of this tree.
    pub fn as_view(&self) -> KdTreeRef<'_, P, A> {
        KdTreeRef::new(self.root_node(), self.num_dims)
    }
}

impl<'a, P, A: Axis> KdTreeRef<'a, P, A> {
    pub(crate) fn new(root: Option<&'a KdNode<P>>, num_dims: Option<usize>) -> Self {
        Self {
            root,
            num_dims,
            size: OnceLock::new(),
            depth: OnceLock::new(),
            phantom: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn root_node(&self) -> Option<&'a KdNode<P>> {
        self.root
    }
}

/// Pre-order iterator over the points of a [`KdTree`] or [`KdTreeRef`].
#[derive(Debug, Clone)]
pub struct Iter<'a, P> {
    stack: Vec<&'a KdNode<P>>,
}

impl<'a, P> Iter<'a, P> {
    fn new(root: Option<&'a KdNode<P>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(&node.datum)
    }
}

macro_rules! generate_common_methods {
    ($kdtree:ident) => {
        /// Returns `true` if the tree holds no points.
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.root_node().is_none()
        }

        /// Returns the number of points in the tree.
        ///
        /// Computed on first call and remembered thereafter.
        pub fn size(&self) -> usize {
            *self
                .size
                .get_or_init(|| self.root_node().map_or(0, KdNode::size))
        }

        /// Returns the number of nodes on the longest path from the root to a leaf, counting
        /// the root. An empty tree has depth 0.
        ///
        /// Computed on first call and remembered thereafter.
        pub fn depth(&self) -> usize {
            *self
                .depth
                .get_or_init(|| self.root_node().map_or(0, KdNode::depth))
        }

        /// Returns the point at the root of the tree, or `None` if the tree is empty.
        #[inline]
        pub fn root(&self) -> Option<&P> {
            self.root_node().map(|node| &node.datum)
        }

        /// Returns the dimensionality of the points in the tree.
        ///
        /// Fails with [`KdTreeError::EmptyTree`] if the tree is empty.
        #[inline]
        pub fn num_dims(&self) -> Result<usize> {
            self.num_dims.ok_or(KdTreeError::EmptyTree)
        }

        /// Returns the axis the root of the tree is split on. Every point to the left has a
        /// co-ordinate on this axis no greater than the root's, every point to the right one
        /// no smaller.
        ///
        /// Fails with [`KdTreeError::EmptyTree`] if the tree is empty.
        #[inline]
        pub fn current_axis(&self) -> Result<usize> {
            self.root_node()
                .map(|node| node.axis)
                .ok_or(KdTreeError::EmptyTree)
        }

        /// Returns a view onto the subtree left of the root, or `None` if the root has no left
        /// child.
        ///
        /// Fails with [`KdTreeError::EmptyTree`] if the tree is empty.
        pub fn left(&self) -> Result<Option<KdTreeRef<'_, P, A>>> {
            let node = self.root_node().ok_or(KdTreeError::EmptyTree)?;
            Ok(node.left().map(|child| KdTreeRef::new(Some(child), self.num_dims)))
        }

        /// Returns a view onto the subtree right of the root, or `None` if the root has no
        /// right child.
        ///
        /// Fails with [`KdTreeError::EmptyTree`] if the tree is empty.
        pub fn right(&self) -> Result<Option<KdTreeRef<'_, P, A>>> {
            let node = self.root_node().ok_or(KdTreeError::EmptyTree)?;
            Ok(node.right().map(|child| KdTreeRef::new(Some(child), self.num_dims)))
        }

        /// Iterate over all points in the tree, in pre-order.
        pub fn iter(&self) -> Iter<'_, P> {
            Iter::new(self.root_node())
        }

        /// Returns every point in the tree, in no particular order.
        pub fn to_list(&self) -> Vec<&P> {
            self.iter().collect()
        }
    };
}

impl<P, A: Axis> KdTree<P, A> {
    generate_common_methods!(KdTree);
}

impl<P, A: Axis> KdTreeRef<'_, P, A> {
    generate_common_methods!(KdTreeRef);
}

impl<'a, P, A: Axis> IntoIterator for &'a KdTree<P, A> {
    type Item = &'a P;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn multiset_eq<'a, 'b, P: Eq + Hash + 'a + 'b>(
    ours: impl Iterator<Item = &'a P>,
    theirs: impl Iterator<Item = &'b P>,
) -> bool {
    let mut counts: HashMap<&P, usize> = HashMap::new();
    for p in ours {
        *counts.entry(p).or_default() += 1;
    }
    for p in theirs {
        match counts.get_mut(p) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    counts.values().all(|&count| count == 0)
}

/// Hashes the multiset of points independently of traversal order: each point is hashed on its
/// own and the per-point hashes are fed to `state` sorted.
fn multiset_hash<'a, P: Hash + 'a, H: Hasher>(points: impl Iterator<Item = &'a P>, state: &mut H) {
    let mut hashes: Vec<u64> = points
        .map(|p| {
            let mut hasher = DefaultHasher::new();
            p.hash(&mut hasher);
            hasher.finish()
        })
        .collect();
    hashes.sort_unstable();
    hashes.hash(state);
}

impl<P: Eq + Hash, A: Axis> PartialEq for KdTree<P, A> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && multiset_eq(self.iter(), other.iter())
    }
}

impl<P: Eq + Hash, A: Axis> Eq for KdTree<P, A> {}

impl<P: Eq + Hash, A: Axis> PartialEq for KdTreeRef<'_, P, A> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && multiset_eq(self.iter(), other.iter())
    }
}

impl<P: Eq + Hash, A: Axis> Eq for KdTreeRef<'_, P, A> {}

impl<P: Eq + Hash, A: Axis> PartialEq<KdTreeRef<'_, P, A>> for KdTree<P, A> {
    fn eq(&self, other: &KdTreeRef<'_, P, A>) -> bool {
        self.size() == other.size() && multiset_eq(self.iter(), other.iter())
    }
}

impl<P: Eq + Hash, A: Axis> PartialEq<KdTree<P, A>> for KdTreeRef<'_, P, A> {
    fn eq(&self, other: &KdTree<P, A>) -> bool {
        other == self
    }
}

impl<P: Hash, A: Axis> Hash for KdTree<P, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        multiset_hash(self.iter(), state);
    }
}

impl<P: Hash, A: Axis> Hash for KdTreeRef<'_, P, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        multiset_hash(self.iter(), state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use std::hash::{Hash, Hasher};

    use crate::error::KdTreeError;
    use crate::kdtree::{KdNode, KdTree};
    use crate::lat_lng::LatLng;

    type AX = f64;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    // hand-assembled so the shape is known independently of the builder:
    //
    //        (5, 5)
    //       /      \
    //   (2, 8)    (9, 1)
    //     /
    //  (1, 3)
    fn handmade_tree() -> KdTree<[i32; 2], AX> {
        let root = KdNode {
            datum: [5, 5],
            axis: 0,
            left: Some(Box::new(KdNode {
                datum: [2, 8],
                axis: 1,
                left: Some(Box::new(KdNode::leaf([1, 3], 0))),
                right: None,
            })),
            right: Some(Box::new(KdNode::leaf([9, 1], 1))),
        };

        KdTree::from_root(Some(Box::new(root)), Some(2))
    }

    #[test]
    fn an_empty_tree_has_no_size_depth_or_root() {
        let tree: KdTree<[i32; 2], AX> = KdTree::default();

        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.root(), None);
        assert!(tree.to_list().is_empty());
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn positional_accessors_fail_on_an_empty_tree() {
        let tree: KdTree<[i32; 2], AX> = KdTree::default();

        assert_eq!(tree.num_dims(), Err(KdTreeError::EmptyTree));
        assert_eq!(tree.current_axis(), Err(KdTreeError::EmptyTree));
        assert!(matches!(tree.left(), Err(KdTreeError::EmptyTree)));
        assert!(matches!(tree.right(), Err(KdTreeError::EmptyTree)));
    }

    #[test]
    fn size_and_depth_count_every_node() {
        let tree = handmade_tree();

        assert!(!tree.is_empty());
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.num_dims().unwrap(), 2);
        assert_eq!(tree.current_axis().unwrap(), 0);
        assert_eq!(tree.root(), Some(&[5, 5]));
    }

    #[test]
    fn subtree_views_are_rooted_at_the_children() {
        let tree = handmade_tree();

        let left = tree.left().unwrap().unwrap();
        assert_eq!(left.root(), Some(&[2, 8]));
        assert_eq!(left.current_axis().unwrap(), 1);
        assert_eq!(left.num_dims().unwrap(), 2);
        assert_eq!(left.size(), 2);
        assert_eq!(left.depth(), 2);

        assert!(left.right().unwrap().is_none());
        let left_left = left.left().unwrap().unwrap();
        assert_eq!(left_left.root(), Some(&[1, 3]));
        assert!(left_left.left().unwrap().is_none());
        assert!(left_left.right().unwrap().is_none());

        let right = tree.right().unwrap().unwrap();
        assert_eq!(right.root(), Some(&[9, 1]));
        assert_eq!(right.size(), 1);
        assert_eq!(right.depth(), 1);
    }

    #[test]
    fn to_list_walks_in_pre_order() {
        let tree = handmade_tree();

        assert_eq!(tree.to_list(), vec![&[5, 5], &[2, 8], &[1, 3], &[9, 1]]);

        let from_into_iter: Vec<_> = (&tree).into_iter().collect();
        assert_eq!(from_into_iter, tree.to_list());
    }

    #[test]
    fn equality_ignores_shape() {
        let tree = handmade_tree();

        // same points, different arrangement
        let other = KdTree::<[i32; 2], AX>::from_root(
            Some(Box::new(KdNode {
                datum: [1, 3],
                axis: 0,
                left: None,
                right: Some(Box::new(KdNode {
                    datum: [9, 1],
                    axis: 1,
                    left: Some(Box::new(KdNode::leaf([5, 5], 0))),
                    right: Some(Box::new(KdNode::leaf([2, 8], 0))),
                })),
            })),
            Some(2),
        );

        assert_eq!(tree, other);
        assert_eq!(hash_of(&tree), hash_of(&other));
        assert_eq!(tree.as_view(), other);
    }

    #[test]
    fn equality_counts_duplicates() {
        let twice = KdTree::<[i32; 1], AX>::from_root(
            Some(Box::new(KdNode {
                datum: [1],
                axis: 0,
                left: None,
                right: Some(Box::new(KdNode::leaf([1], 0))),
            })),
            Some(1),
        );
        let once = KdTree::<[i32; 1], AX>::from_root(Some(Box::new(KdNode::leaf([1], 0))), Some(1));
        let other_pair = KdTree::<[i32; 1], AX>::from_root(
            Some(Box::new(KdNode {
                datum: [1],
                axis: 0,
                left: None,
                right: Some(Box::new(KdNode::leaf([2], 0))),
            })),
            Some(1),
        );

        assert_ne!(twice, once);
        assert_ne!(twice, other_pair);
        assert_eq!(twice, twice.clone());
    }

    #[test]
    fn empty_trees_are_equal() {
        let a: KdTree<[i32; 2], AX> = KdTree::default();
        let b: KdTree<[i32; 2], AX> = KdTree::default();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, handmade_tree());
    }

    #[test]
    fn subtree_views_compare_by_content() {
        let tree = handmade_tree();
        let left = tree.left().unwrap().unwrap();
        let right = tree.right().unwrap().unwrap();

        assert_ne!(left, right);
        assert_eq!(left, tree.left().unwrap().unwrap());
        assert_eq!(hash_of(&left), hash_of(&tree.left().unwrap().unwrap()));

        let contents: HashSet<_> = left.iter().collect();
        assert_eq!(contents, HashSet::from([&[2, 8], &[1, 3]]));
    }

    #[test]
    fn built_position_trees_compare_by_content() {
        let positions = vec![
            LatLng::new(40.7, -74.0),
            LatLng::new(34.1, -118.2),
            LatLng::new(41.9, -87.6),
            LatLng::new(29.8, -95.4),
            LatLng::new(34.1, -118.2),
        ];
        let mut shuffled = positions.clone();
        shuffled.rotate_left(2);

        let a: KdTree<LatLng> = KdTree::build(positions.clone()).unwrap();
        let b: KdTree<LatLng> = KdTree::build(shuffled).unwrap();
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));

        // one fewer copy of the duplicate
        let c: KdTree<LatLng> = KdTree::build(positions[..4].to_vec()).unwrap();
        assert_ne!(a, c);
    }
}
