//! Throughput benchmarks for the hot paths of the agreement core: vote
//! quorum bookkeeping and subset election, mirroring the shape of
//! `consensus_benchmark.rs` (per-node-count groups, black-boxed inputs).

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dexagree::elector::{elect_subset, notary_set_target};
use dexagree::{Hash, NodeId, NodeSet, VoteKind, VoteStore};

fn node(byte: u8) -> NodeId {
    NodeId(Hash([byte; 32]))
}

fn bench_vote_store_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("vote_store_insert");

    for signer_count in [4usize, 13, 50, 100] {
        group.throughput(Throughput::Elements(signer_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(signer_count),
            &signer_count,
            |b, &count| {
                b.iter(|| {
                    let store = VoteStore::new();
                    let hash = Hash([9u8; 32]);
                    for i in 0..count {
                        let vote = dexagree::Vote {
                            proposer_id: node((i % 255) as u8),
                            kind: VoteKind::Ack,
                            block_hash: hash,
                            period: 1,
                            signature: Vec::new(),
                        };
                        store.insert(black_box(&vote));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_quorum_hash(c: &mut Criterion) {
    let store = VoteStore::new();
    for i in 0..50u8 {
        store.insert(&dexagree::Vote {
            proposer_id: node(i),
            kind: VoteKind::Pass,
            block_hash: Hash([3u8; 32]),
            period: 1,
            signature: Vec::new(),
        });
    }

    c.bench_function("quorum_hash_lookup", |b| {
        b.iter(|| black_box(store.quorum_hash(1, VoteKind::Pass, 34)));
    });
}

fn bench_subset_election(c: &mut Criterion) {
    let mut group = c.benchmark_group("subset_election");

    for node_count in [10usize, 100, 1000] {
        let nodes = NodeSet::from_iter((0..node_count).map(|i| node((i % 255) as u8)));
        let target = notary_set_target(Hash([0x42u8; 32]), 1);

        group.throughput(Throughput::Elements(node_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(node_count),
            &node_count,
            |b, _| {
                b.iter(|| {
                    black_box(elect_subset(&nodes, target, 7));
                });
            },
        );
    }

    group.finish();
}

fn bench_target_construction(c: &mut Criterion) {
    c.bench_function("notary_set_target", |b| {
        let crs = Hash([0xabu8; 32]);
        b.iter(|| black_box(notary_set_target(black_box(crs), black_box(1))));
    });
}

criterion_group!(
    benches,
    bench_vote_store_insert,
    bench_quorum_hash,
    bench_subset_election,
    bench_target_construction,
);
criterion_main!(benches);
