//! The block-proposer boundary.
//!
//! Block body construction, validation, and execution are external
//! collaborators; this core only ever needs "give me a fresh candidate with
//! my identity on it." Mirrors [`crate::crypto::Signer`]'s shape: a trait so
//! the proposer can be a real mempool, a test fixture, or (as below) a bare
//! closure.

use crate::types::Block;

/// Construction input `block_proposer() -> Block` from the driver's external
/// interfaces: fills `proposer_id` with self and assigns a unique hash.
pub trait BlockProposer: Send + Sync {
    fn propose(&self) -> Block;
}

impl<F> BlockProposer for F
where
    F: Fn() -> Block + Send + Sync,
{
    fn propose(&self) -> Block {
        self()
    }
}
