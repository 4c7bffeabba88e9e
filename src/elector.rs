//! Deterministic subset election by ranked distance to a target hash.
//!
//! Grounded on `core/types/nodeset.go`'s `GetSubSet`: a bounded max-heap of
//! size `k` keyed by `|ID − target|`. Node identities and the target are both
//! interpreted as 256-bit big-endian integers (`primitive_types::U256`,
//! borrowed from `blockchain-core` in the pack's `monarch-of-war-Blockchainframe`
//! repo, which already carries it for exactly this kind of big-integer
//! distance arithmetic).

use crate::node_set::NodeSet;
use crate::types::{Hash, NodeId};
use primitive_types::U256;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Single-byte role tags distinguishing the three target constructions.
const NOTARY_TAG: u8 = 0;
const WITNESS_TAG: u8 = 1;
const DKG_TAG: u8 = 2;

/// Target for electing the notary set of a chain: `keccak256(crs ||
/// chain_id_le32 || NOTARY_TAG)`.
pub fn notary_set_target(crs: Hash, chain_id: u32) -> U256 {
    target(crs, &chain_id.to_le_bytes(), NOTARY_TAG)
}

/// Target for electing the witness set of a round: `keccak256(crs ||
/// round_le64 || WITNESS_TAG)`.
pub fn witness_set_target(crs: Hash, round: u64) -> U256 {
    target(crs, &round.to_le_bytes(), WITNESS_TAG)
}

/// Target for electing the DKG set of a round: `keccak256(crs || round_le64
/// || DKG_TAG)`.
pub fn dkg_set_target(crs: Hash, round: u64) -> U256 {
    target(crs, &round.to_le_bytes(), DKG_TAG)
}

fn target(crs: Hash, extra: &[u8], tag: u8) -> U256 {
    let digest = Hash::keccak256(&[crs.as_ref(), extra, &[tag]]);
    U256::from_big_endian(&digest.0)
}

/// Returns the `min(k, |nodes|)` node ids whose id, interpreted as a
/// big-endian 256-bit integer, is closest to `target` by absolute
/// difference. Unordered result: determinism comes from the distance metric
/// being identical everywhere, not from iteration order.
pub fn elect_subset(nodes: &NodeSet, target: U256, k: usize) -> HashSet<NodeId> {
    if k == 0 || nodes.is_empty() {
        return HashSet::new();
    }

    let mut heap: BinaryHeap<NodeRank> = BinaryHeap::with_capacity(k);
    for &id in nodes.iter() {
        let distance = node_distance(id, target);
        if heap.len() < k {
            heap.push(NodeRank { distance, id });
        } else if heap.peek().is_some_and(|top| distance < top.distance) {
            heap.pop();
            heap.push(NodeRank { distance, id });
        }
    }

    heap.into_iter().map(|rank| rank.id).collect()
}

fn node_distance(id: NodeId, target: U256) -> U256 {
    let id_num = U256::from_big_endian(&(id.0).0);
    if id_num >= target {
        id_num - target
    } else {
        target - id_num
    }
}

/// A node paired with its distance to the election target. `Ord` is keyed
/// solely on distance so a `BinaryHeap<NodeRank>` behaves as the max-heap the
/// election algorithm needs (largest distance bubbles to the root, ready to
/// be evicted by a closer candidate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeRank {
    distance: U256,
    id: NodeId,
}

impl Ord for NodeRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance.cmp(&other.distance)
    }
}

impl PartialOrd for NodeRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
