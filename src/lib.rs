#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]

//! # kdsearch
//!
//! An immutable, balanced k-d tree for nearest-neighbour, k-nearest-neighbour and radius
//! queries over points of any dimensionality.
//!
//! The tree is built once from a fixed collection of points and never modified afterwards.
//! Anything implementing [`Point`] can be stored, and queries may be made from a different
//! `Point` type than the stored one so long as the dimensionality agrees. Distances are
//! Euclidean.
//!
//! ## Installation
//!
//! Add `kdsearch` to `Cargo.toml`
//! ```toml
//! [dependencies]
//! kdsearch = "0.1.0"
//! ```
//!
//! ## Usage
//! ```rust
//! use kdsearch::KdTree;
//!
//! let points = vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [-1.0, -1.0]];
//! let tree: KdTree<[f64; 2]> = KdTree::build(points)?;
//!
//! assert_eq!(tree.size(), 4);
//! assert_eq!(tree.depth(), 3);
//!
//! // (0, 0) is exactly as close as (1, 1), but (1, 1) is found first
//! assert_eq!(tree.nearest_one(&[0.5, 0.5])?, &[1.0, 1.0]);
//!
//! assert_eq!(
//!     tree.nearest_n(&[2.1, 2.1], 2)?,
//!     vec![&[2.0, 2.0], &[1.0, 1.0]]
//! );
//!
//! let within = tree.within_radius_neighbours(&[0.0, 0.0], 1.5)?;
//! assert_eq!(within.len(), 3);
//! assert_eq!(within[0].item, &[0.0, 0.0]);
//! assert_eq!(within[0].distance, 0.0);
//! # Ok::<(), kdsearch::KdTreeError>(())
//! ```
//!
//! ## Optional features
//!
//! * `tracing` (default): emits [`tracing`](https://docs.rs/tracing) events when trees are
//!   built and queried.
//! * `test_utils`: exhaustive-scan reference queries and seeded random data generators.

mod construction;
pub mod error;
pub mod kdtree;
pub mod lat_lng;
pub mod neighbour;
pub mod ordering;
pub mod point;
mod query;
mod result_collection;
#[cfg(feature = "test_utils")]
#[doc(hidden)]
pub mod test_utils;

#[doc(inline)]
pub use crate::error::{KdTreeError, Result};
#[doc(inline)]
pub use crate::kdtree::{KdTree, KdTreeRef};
#[doc(inline)]
pub use crate::lat_lng::LatLng;
#[doc(inline)]
pub use crate::neighbour::Neighbour;
#[doc(inline)]
pub use crate::ordering::{AxisOrder, ProximityOrder};
#[doc(inline)]
pub use crate::point::{Axis, Point};
