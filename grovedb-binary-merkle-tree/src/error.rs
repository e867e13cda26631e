//! Error types for binary Merkle tree operations.

use thiserror::Error;

/// Alias for `core::result::Result<T, MerkleTreeError>`.
pub type Result<T> = core::result::Result<T, MerkleTreeError>;

/// Errors from tree construction, lookup, proof generation and diffing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    /// A required input is empty, or the data/branch it names is not part of
    /// the tree.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Two trees cannot be compared: different widths, or a leaf was paired
    /// against an internal node.
    #[error("incompatible trees: {0}")]
    IncompatibleTrees(String),
}

/// Errors from advancing a fail-fast [`Cursor`](crate::Cursor).
///
/// None is recoverable: a new cursor must be started.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IterationError {
    /// The cursor already yielded the last element.
    #[error("no more elements in the list")]
    EndOfSequence,
    /// The list was modified after the cursor was created.
    #[error("list modified during iteration (expected modification {expected}, found {actual})")]
    ConcurrentModification {
        /// Modification count snapshotted when the cursor was created.
        expected: u64,
        /// Modification count of the list when the cursor advanced.
        actual: u64,
    },
    /// The cursor was started on a different list.
    #[error("cursor belongs to another list")]
    ForeignCursor,
}
