//! Inclusion proofs for the binary Merkle tree.
//!
//! A [`MerkleProof`] is the list of sibling digests met on the way from a
//! leaf (or branch) up to the root, bottom first. Each step says on which side
//! the sibling sits, so replaying the steps rebuilds the root digest:
//!
//! - `is_left`: `hash = H(sibling || hash)`
//! - otherwise: `hash = H(hash || sibling)`
//!
//! The number of steps is capped when the proof is created; once the cap is
//! reached [`MerkleProof::add_hash`] refuses further steps.

use std::{borrow::Cow, fmt};

use itertools::Itertools;
use log::debug;

use crate::{
    hash::{combine, digest_of, Digest, Hashable},
    MerkleNode, OrderedHashList,
};

#[cfg(test)]
mod tests;

/// One step of a proof: a sibling digest and the side it sits on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProofStep {
    digest: Digest,
    is_left: bool,
}

impl ProofStep {
    /// Step with sibling `digest` on the given side.
    pub fn new(digest: Digest, is_left: bool) -> Self {
        ProofStep { digest, is_left }
    }

    /// The sibling's digest.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Whether the sibling is concatenated on the left of the running hash.
    pub fn is_left(&self) -> bool {
        self.is_left
    }

    /// Parent digest of `hash` and this step's sibling.
    fn apply(&self, hash: &Digest) -> Digest {
        if self.is_left {
            combine(&self.digest, hash)
        } else {
            combine(hash, &self.digest)
        }
    }
}

impl fmt::Display for ProofStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.digest, if self.is_left { "L" } else { "R" })
    }
}

impl Hashable for ProofStep {
    fn hash_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Owned(self.to_string().into_bytes())
    }
}

/// A length-capped inclusion proof against a fixed root digest.
#[derive(Clone, Debug)]
pub struct MerkleProof {
    steps: OrderedHashList<ProofStep>,
    root_digest: Digest,
    length: usize,
}

impl MerkleProof {
    /// Empty proof against `root_digest` that accepts at most `length` steps.
    pub fn new(root_digest: Digest, length: usize) -> Self {
        MerkleProof {
            steps: OrderedHashList::new(),
            root_digest,
            length,
        }
    }

    /// Maximum number of steps, fixed at creation.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of steps appended so far.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether no further step can be appended.
    pub fn is_full(&self) -> bool {
        self.steps.len() >= self.length
    }

    /// Root digest the proof was built against.
    pub fn root_digest(&self) -> &Digest {
        &self.root_digest
    }

    /// The steps, bottom first.
    pub fn steps(&self) -> &OrderedHashList<ProofStep> {
        &self.steps
    }

    /// Append a step. Returns `false`, leaving the proof untouched, if the
    /// proof already holds `length` steps.
    pub fn add_hash(&mut self, digest: Digest, is_left: bool) -> bool {
        if self.is_full() {
            return false;
        }
        self.steps.insert_tail(ProofStep::new(digest, is_left));
        true
    }

    /// Whether `data` is committed to by the root digest through this proof.
    pub fn prove_validity_of_data<T: Hashable + ?Sized>(&self, data: &T) -> bool {
        self.proves(digest_of(data))
    }

    /// Whether `branch` is committed to by the root digest through this
    /// proof. Only the branch's digest is used.
    pub fn prove_validity_of_branch(&self, branch: &MerkleNode) -> bool {
        self.proves(branch.digest().clone())
    }

    /// Replay every step starting from `digest`.
    pub fn compute_root(&self, digest: Digest) -> Digest {
        self.steps.iter().fold(digest, |hash, step| step.apply(&hash))
    }

    fn proves(&self, digest: Digest) -> bool {
        let computed = self.compute_root(digest);
        if computed != self.root_digest {
            debug!(
                "proof mismatch: computed root {}, expected {}",
                computed, self.root_digest
            );
            return false;
        }
        true
    }
}

impl fmt::Display for MerkleProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] -> {}",
            self.steps.iter().join(", "),
            self.root_digest
        )
    }
}
