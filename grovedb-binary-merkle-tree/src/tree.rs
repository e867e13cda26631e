use std::{
    collections::{BTreeSet, VecDeque},
    iter,
};

use itertools::Itertools;
use log::{debug, trace};

use crate::{
    hash::{digest_of, Digest, Hashable},
    MerkleNode, MerkleProof, MerkleTreeError, OrderedHashList, Result,
};

/// A complete binary Merkle tree over an ordered list of digests.
///
/// The leaf level is padded with empty-digest leaves up to the next power of
/// two, so every level below the root has an even number of nodes. The tree
/// is immutable once built; a changed dataset needs a new tree.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    root: MerkleNode,
    width: usize,
}

impl MerkleTree {
    /// Build a tree over the digests of `list`, in list order.
    pub fn build<T>(list: &OrderedHashList<T>) -> Result<Self> {
        Self::from_digests(list.all_digests())
    }

    /// Build a tree over `digests`, in order.
    ///
    /// Fails with [`MerkleTreeError::InvalidArgument`] if `digests` is empty
    /// or carries the padding sentinel, which is reserved for filler leaves.
    pub fn from_digests(digests: Vec<Digest>) -> Result<Self> {
        if digests.is_empty() {
            return Err(MerkleTreeError::InvalidArgument(
                "cannot build a Merkle tree from an empty list".to_string(),
            ));
        }
        if let Some(index) = digests.iter().position(Digest::is_padding) {
            return Err(MerkleTreeError::InvalidArgument(format!(
                "digest at index {} is the reserved padding digest",
                index
            )));
        }
        let width = digests.len();
        let leaf_count = width.next_power_of_two();

        let mut level: Vec<MerkleNode> = digests
            .into_iter()
            .map(MerkleNode::leaf)
            .chain(iter::repeat_with(MerkleNode::padding).take(leaf_count - width))
            .collect();

        // Power-of-two level sizes: `tuples` never drops a trailing node.
        while level.len() > 1 {
            trace!("pairing {} nodes", level.len());
            level = level
                .into_iter()
                .tuples()
                .map(|(left, right)| MerkleNode::internal(left, right))
                .collect();
        }
        let root = level.swap_remove(0);

        let tree = MerkleTree { root, width };
        debug!(
            "built Merkle tree: width {}, leaves {}, height {}, root {}",
            width,
            leaf_count,
            tree.height(),
            tree.root.digest()
        );
        Ok(tree)
    }

    /// The root node.
    pub fn root(&self) -> &MerkleNode {
        &self.root
    }

    /// Number of real (non-padding) leaves.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of edges from the root to any leaf; 0 for a single leaf.
    pub fn height(&self) -> usize {
        let mut node = &self.root;
        let mut height = 0;
        while let Some(left) = node.left() {
            node = left;
            height += 1;
        }
        height
    }

    /// Number of leaves including padding.
    pub fn leaf_count(&self) -> usize {
        1 << self.height()
    }

    /// Leaf digests left to right, padding included.
    pub fn leaf_digests(&self) -> Vec<Digest> {
        let mut digests = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node.children() {
                Some((left, right)) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => digests.push(node.digest().clone()),
            }
        }
        digests
    }

    /// Index of the first leaf committing to `data`, counting from the
    /// leftmost leaf of the tree.
    pub fn index_of<T: Hashable + ?Sized>(&self, data: &T) -> Option<usize> {
        leaf_index(&self.root, &digest_of(data))
    }

    /// Index of the first leaf under `branch` committing to `data`.
    ///
    /// `branch` is looked up in this tree first and must be part of it. The
    /// index counts from the leftmost leaf of that subtree, not of the whole
    /// tree; add the subtree's own offset to get an absolute position.
    pub fn index_of_in_branch<T: Hashable + ?Sized>(
        &self,
        branch: &MerkleNode,
        data: &T,
    ) -> Result<Option<usize>> {
        let subtree = self.find_node(branch).ok_or_else(|| {
            MerkleTreeError::InvalidArgument(format!(
                "branch {} is not part of this tree",
                branch.digest()
            ))
        })?;
        Ok(leaf_index(subtree, &digest_of(data)))
    }

    /// Whether some leaf commits to `data`.
    pub fn validate_data<T: Hashable + ?Sized>(&self, data: &T) -> bool {
        contains_leaf(&self.root, &digest_of(data))
    }

    /// Whether some node of this tree, leaf or internal, equals `branch`.
    pub fn validate_branch(&self, branch: &MerkleNode) -> bool {
        self.find_node(branch).is_some()
    }

    /// Whether `other` commits to exactly the same data.
    ///
    /// Trees of different width are never equal; that case returns `false`
    /// without walking either tree.
    pub fn validate_tree(&self, other: &MerkleTree) -> Result<bool> {
        if self.width != other.width {
            return Ok(false);
        }
        Ok(self.find_invalid_data_indices(other)?.is_empty())
    }

    /// Leaf indices at which `other` commits to different data.
    ///
    /// Both trees are walked breadth-first in lock-step. A pair of equal
    /// internal nodes is not descended into, so the cost grows with the
    /// number of differing leaves rather than with the size of the tree.
    pub fn find_invalid_data_indices(&self, other: &MerkleTree) -> Result<BTreeSet<usize>> {
        if self.width != other.width {
            return Err(MerkleTreeError::IncompatibleTrees(format!(
                "width {} differs from width {}",
                self.width, other.width
            )));
        }

        let mut invalid = BTreeSet::new();
        let mut compared = 0usize;
        // (ours, theirs, index of the leftmost leaf below, leaves below)
        let mut queue = VecDeque::from([(&self.root, &other.root, 0usize, self.leaf_count())]);
        while let Some((ours, theirs, offset, span)) = queue.pop_front() {
            compared += 1;
            match (ours.children(), theirs.children()) {
                (None, None) => {
                    if ours != theirs {
                        invalid.insert(offset);
                    }
                }
                (Some((our_left, our_right)), Some((their_left, their_right))) => {
                    if ours == theirs {
                        trace!("pruned equal subtree {} at leaf {}", ours.digest(), offset);
                        continue;
                    }
                    let half = span / 2;
                    queue.push_back((our_left, their_left, offset, half));
                    queue.push_back((our_right, their_right, offset + half, half));
                }
                _ => {
                    return Err(MerkleTreeError::IncompatibleTrees(format!(
                        "leaf paired with internal node below leaf {}",
                        offset
                    )));
                }
            }
        }

        debug!(
            "tree diff: {} differing leaves, {} node pairs compared",
            invalid.len(),
            compared
        );
        Ok(invalid)
    }

    /// Nodes from `current` down to the first node whose digest is `digest`,
    /// both ends included. Left subtrees are searched before right ones.
    pub fn path_to_node<'a>(
        current: &'a MerkleNode,
        digest: &Digest,
    ) -> Option<Vec<&'a MerkleNode>> {
        let mut path = path_upwards(current, digest)?;
        path.reverse();
        Some(path)
    }

    /// Proof that `data` is committed to by this tree's root.
    pub fn merkle_proof<T: Hashable + ?Sized>(&self, data: &T) -> Result<MerkleProof> {
        let digest = digest_of(data);
        self.proof_for_digest(&digest).ok_or_else(|| {
            debug!("no leaf for digest {}, cannot build proof", digest);
            MerkleTreeError::InvalidArgument(format!("data {} is not part of this tree", digest))
        })
    }

    /// Proof that `branch` is a subtree of this tree.
    pub fn merkle_proof_for_branch(&self, branch: &MerkleNode) -> Result<MerkleProof> {
        self.proof_for_digest(branch.digest()).ok_or_else(|| {
            debug!("no node for digest {}, cannot build proof", branch.digest());
            MerkleTreeError::InvalidArgument(format!(
                "branch {} is not part of this tree",
                branch.digest()
            ))
        })
    }

    fn proof_for_digest(&self, digest: &Digest) -> Option<MerkleProof> {
        let path = Self::path_to_node(&self.root, digest)?;
        let mut proof = MerkleProof::new(self.root.digest().clone(), path.len() - 1);
        // Walk from the target's parent up to the root.
        for pair in path.windows(2).rev() {
            let (parent, child) = (pair[0], pair[1]);
            let Some((left, right)) = parent.children() else {
                continue;
            };
            let is_left_child = left.digest() == child.digest();
            let sibling = if is_left_child { right } else { left };
            let added = proof.add_hash(sibling.digest().clone(), !is_left_child);
            debug_assert!(added, "proof sized to its path");
        }
        Some(proof)
    }

    fn find_node(&self, target: &MerkleNode) -> Option<&MerkleNode> {
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            if node == target {
                return Some(node);
            }
            if let Some((left, right)) = node.children() {
                stack.push(right);
                stack.push(left);
            }
        }
        None
    }
}

/// Depth-first leaf count up to the first leaf carrying `digest`.
fn leaf_index(subtree: &MerkleNode, digest: &Digest) -> Option<usize> {
    let mut stack = vec![subtree];
    let mut index = 0;
    while let Some(node) = stack.pop() {
        match node.children() {
            Some((left, right)) => {
                stack.push(right);
                stack.push(left);
            }
            None if node.digest() == digest => return Some(index),
            None => index += 1,
        }
    }
    None
}

fn contains_leaf(node: &MerkleNode, digest: &Digest) -> bool {
    match node.children() {
        Some((left, right)) => contains_leaf(left, digest) || contains_leaf(right, digest),
        None => node.digest() == digest,
    }
}

/// Path from the match up to `current`.
fn path_upwards<'a>(current: &'a MerkleNode, digest: &Digest) -> Option<Vec<&'a MerkleNode>> {
    if current.digest() == digest {
        return Some(vec![current]);
    }
    let (left, right) = current.children()?;
    let mut path = path_upwards(left, digest).or_else(|| path_upwards(right, digest))?;
    path.push(current);
    Some(path)
}
