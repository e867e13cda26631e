//! Complete binary Merkle tree over an ordered hash list.
//!
//! Data items go into an [`OrderedHashList`], which hashes each one as it is
//! inserted. [`MerkleTree::build`] pads the list's digests to the next power
//! of two with empty-digest leaves and pairs them bottom-up into a single
//! root:
//!
//! `parent = blake3(left_hex || right_hex)`, or the empty digest when both
//! children are padding.
//!
//! A built tree answers membership queries, produces [`MerkleProof`]s for a
//! data item or a whole branch, and diffs itself against another tree of the
//! same width without visiting subtrees whose digests already match.

#![warn(missing_docs)]

mod error;
pub mod hash;
mod hash_list;
mod node;
mod proof;
mod tree;


pub use error::{IterationError, MerkleTreeError, Result};
pub use hash::{Digest, Hashable};
pub use hash_list::{Cursor, Iter, OrderedHashList};
pub use node::MerkleNode;
pub use proof::{MerkleProof, ProofStep};
pub use tree::MerkleTree;
