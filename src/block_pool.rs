//! Block pool: candidate blocks proposed into the current agreement,
//! keyed by hash.
//!
//! Bounded by the votes/blocks actually in flight during one agreement
//! instance, so it is acceptable to keep every entry for the instance's
//! whole lifetime rather than garbage-collecting it.

use crate::types::{Block, Hash};
use dashmap::DashMap;

#[derive(Default)]
pub struct BlockPool {
    blocks: DashMap<Hash, Block>,
}

impl BlockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `block` if its hash is new. Returns `false` if the hash was
    /// already present — feeding the same block twice is a no-op.
    pub fn insert(&self, block: Block) -> bool {
        if self.blocks.contains_key(&block.hash) {
            return false;
        }
        self.blocks.insert(block.hash, block);
        true
    }

    pub fn get(&self, hash: &Hash) -> Option<Block> {
        self.blocks.get(hash).map(|entry| entry.clone())
    }

    pub fn contains(&self, hash: &Hash) -> bool {
        self.blocks.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter_hashes(&self) -> Vec<Hash> {
        self.blocks.iter().map(|entry| *entry.key()).collect()
    }
}
