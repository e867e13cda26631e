#[macro_use]
extern crate criterion;

use criterion::{BenchmarkId, Criterion};
use grovedb_binary_merkle_tree::{MerkleTree, OrderedHashList};
use rand::{seq::SliceRandom, thread_rng};

fn prepare_list(count: usize) -> OrderedHashList<Vec<u8>> {
    (0..count as u64).map(|i| i.to_le_bytes().to_vec()).collect()
}

fn bench(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("binary Merkle tree build");
        let inputs = [1_000, 10_000, 100_000];
        for input in inputs.iter() {
            let list = prepare_list(*input);
            group.bench_with_input(BenchmarkId::new("leaves", input), &list, |b, list| {
                b.iter(|| MerkleTree::build(list).expect("build"));
            });
        }
    }

    c.bench_function("binary Merkle tree gen proof", |b| {
        let list = prepare_list(10_000);
        let items: Vec<Vec<u8>> = list.iter().cloned().collect();
        let tree = MerkleTree::build(&list).expect("build");
        let mut rng = thread_rng();
        b.iter(|| {
            let item = items.choose(&mut rng).expect("non-empty");
            tree.merkle_proof(item).expect("gen proof")
        });
    });

    c.bench_function("binary Merkle tree verify", |b| {
        let list = prepare_list(10_000);
        let tree = MerkleTree::build(&list).expect("build");
        let mut rng = thread_rng();
        let proofs: Vec<_> = list
            .iter()
            .take(1_000)
            .map(|item| (item.clone(), tree.merkle_proof(item).expect("gen proof")))
            .collect();
        b.iter(|| {
            let (item, proof) = proofs.choose(&mut rng).expect("non-empty");
            assert!(proof.prove_validity_of_data(item));
        });
    });

    c.bench_function("binary Merkle tree diff", |b| {
        let list = prepare_list(10_000);
        let mut changed = prepare_list(10_000);
        changed.remove_first_match(&5_000u64.to_le_bytes().to_vec());
        changed.insert_tail(b"changed".to_vec());
        let tree = MerkleTree::build(&list).expect("build");
        let other = MerkleTree::build(&changed).expect("build");
        b.iter(|| tree.find_invalid_data_indices(&other).expect("same width"));
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
