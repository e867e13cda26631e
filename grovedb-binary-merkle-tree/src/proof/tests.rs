use super::*;
use crate::{hash::hash_bytes, IterationError, MerkleTree};

fn two_leaf_root() -> Digest {
    combine(&hash_bytes(b"a"), &hash_bytes(b"b"))
}

#[test]
fn test_add_hash_respects_length_cap() {
    let mut proof = MerkleProof::new(two_leaf_root(), 2);
    assert!(!proof.is_full());
    assert!(proof.add_hash(hash_bytes(b"x"), true));
    assert!(proof.add_hash(hash_bytes(b"y"), false));
    assert!(proof.is_full());

    assert!(!proof.add_hash(hash_bytes(b"z"), true));
    assert_eq!(proof.length(), 2);
    assert_eq!(proof.step_count(), 2);
    let steps: Vec<&ProofStep> = proof.steps().iter().collect();
    assert_eq!(
        steps,
        vec![
            &ProofStep::new(hash_bytes(b"x"), true),
            &ProofStep::new(hash_bytes(b"y"), false)
        ]
    );
}

#[test]
fn test_zero_length_proof() {
    let mut proof = MerkleProof::new(hash_bytes(b"x"), 0);
    assert!(proof.is_full());
    assert!(!proof.add_hash(hash_bytes(b"y"), true));
    assert!(proof.prove_validity_of_data("x"));
    assert!(proof.prove_validity_of_branch(&MerkleNode::for_data("x")));
    assert!(!proof.prove_validity_of_data("y"));
}

#[test]
fn test_hand_built_proof_verifies() {
    // Proof for "a" in the tree [a, b]: sibling "b" sits on the right.
    let mut proof = MerkleProof::new(two_leaf_root(), 1);
    assert!(proof.add_hash(hash_bytes(b"b"), false));
    assert!(proof.prove_validity_of_data("a"));
    assert!(!proof.prove_validity_of_data("b"));

    // Proof for "b": sibling "a" sits on the left.
    let mut proof = MerkleProof::new(two_leaf_root(), 1);
    assert!(proof.add_hash(hash_bytes(b"a"), true));
    assert!(proof.prove_validity_of_data("b"));

    // Wrong side flag.
    let mut proof = MerkleProof::new(two_leaf_root(), 1);
    assert!(proof.add_hash(hash_bytes(b"a"), false));
    assert!(!proof.prove_validity_of_data("b"));
}

#[test]
fn test_proof_against_wrong_root_fails() {
    let mut proof = MerkleProof::new(hash_bytes(b"not a root"), 1);
    assert!(proof.add_hash(hash_bytes(b"b"), false));
    assert!(!proof.prove_validity_of_data("a"));
    assert_eq!(proof.compute_root(hash_bytes(b"a")), two_leaf_root());
}

#[test]
fn test_generated_proof_matches_hand_built() {
    let list: OrderedHashList<&str> = ["a", "b"].into_iter().collect();
    let tree = MerkleTree::build(&list).expect("build");
    let proof = tree.merkle_proof("a").expect("a is in the tree");
    assert_eq!(proof.root_digest(), &two_leaf_root());
    assert_eq!(proof.length(), 1);

    let steps = proof.steps();
    let mut cursor = steps.cursor();
    assert_eq!(
        steps.advance(&mut cursor),
        Ok(&ProofStep::new(hash_bytes(b"b"), false))
    );
    assert_eq!(steps.advance(&mut cursor), Err(IterationError::EndOfSequence));
}

#[test]
fn test_proof_step_display_and_equality() {
    let left = ProofStep::new(hash_bytes(b"a"), true);
    let right = ProofStep::new(hash_bytes(b"a"), false);
    assert_eq!(left.to_string(), format!("{}L", hash_bytes(b"a")));
    assert_eq!(right.to_string(), format!("{}R", hash_bytes(b"a")));
    assert_ne!(left, right);
    assert_eq!(left, ProofStep::new(hash_bytes(b"a"), true));
    assert_ne!(digest_of(&left), digest_of(&right));
}

#[test]
fn test_proof_display() {
    let mut proof = MerkleProof::new(two_leaf_root(), 1);
    assert!(proof.add_hash(hash_bytes(b"b"), false));
    assert_eq!(
        proof.to_string(),
        format!("[{}R] -> {}", hash_bytes(b"b"), two_leaf_root())
    );
}
