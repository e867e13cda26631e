//! Immutable Merkle tree nodes.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::hash::{combine, digest_of, Digest, Hashable};

/// A node of a binary Merkle tree.
///
/// A node either has two owned children or none; it is a leaf iff it has
/// none. Nodes cannot be modified once built.
///
/// Equality and hashing look only at the digest and at whether the node is a
/// leaf, never at the subtree below. A subtree taken from a different tree
/// therefore compares equal to this one whenever it commits to the same data,
/// which is what [`MerkleTree::validate_branch`](crate::MerkleTree::validate_branch)
/// and the tree diff rely on.
#[derive(Clone, Debug)]
pub struct MerkleNode {
    digest: Digest,
    children: Option<Box<(MerkleNode, MerkleNode)>>,
}

impl MerkleNode {
    /// Leaf carrying `digest`.
    pub fn leaf(digest: Digest) -> Self {
        MerkleNode {
            digest,
            children: None,
        }
    }

    /// Leaf committing to a single data item.
    pub fn for_data<T: Hashable + ?Sized>(item: &T) -> Self {
        Self::leaf(digest_of(item))
    }

    /// Padding leaf, carrying the empty sentinel digest.
    pub fn padding() -> Self {
        Self::leaf(Digest::padding())
    }

    /// Internal node over `left` and `right`, with its digest derived by
    /// [`combine`].
    pub fn internal(left: MerkleNode, right: MerkleNode) -> Self {
        let digest = combine(&left.digest, &right.digest);
        Self::from_parts(digest, left, right)
    }

    /// Internal node with a caller-supplied digest. The digest is not checked
    /// against the children.
    pub fn from_parts(digest: Digest, left: MerkleNode, right: MerkleNode) -> Self {
        MerkleNode {
            digest,
            children: Some(Box::new((left, right))),
        }
    }

    /// The node's digest.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Whether the node commits to no real data at all.
    pub fn is_padding(&self) -> bool {
        self.digest.is_padding()
    }

    /// Left child, `None` for a leaf.
    pub fn left(&self) -> Option<&MerkleNode> {
        self.children.as_deref().map(|(left, _)| left)
    }

    /// Right child, `None` for a leaf.
    pub fn right(&self) -> Option<&MerkleNode> {
        self.children.as_deref().map(|(_, right)| right)
    }

    /// Both children, or `None` for a leaf.
    pub fn children(&self) -> Option<(&MerkleNode, &MerkleNode)> {
        self.children.as_deref().map(|(left, right)| (left, right))
    }
}

impl PartialEq for MerkleNode {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest && self.is_leaf() == other.is_leaf()
    }
}

impl Eq for MerkleNode {}

impl Hash for MerkleNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digest.hash(state);
        self.is_leaf().hash(state);
    }
}

impl fmt::Display for MerkleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.digest, f)
    }
}
