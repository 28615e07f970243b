//! Common error type for building and querying trees.

use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KdTreeError {
    /// Malformed construction or query arguments: mixed or zero dimensionality,
    /// a zero `k`, or a negative radius.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Two operands disagree on dimensionality, or a component index is out of range.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    Dimension {
        /// the dimensionality (or exclusive index bound) that was required
        expected: usize,
        /// the dimensionality (or index) that was supplied
        found: usize,
    },

    /// A structural query was made on a tree with no elements.
    #[error("Tree is empty")]
    EmptyTree,
}

/// Result type returned throughout this crate.
pub type Result<T> = std::result::Result<T, KdTreeError>;
