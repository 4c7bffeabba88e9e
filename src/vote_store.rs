//! Vote store & quorum index: records signed votes by `(period, kind,
//! block_hash)` and answers "does some block have ≥ T votes" queries.
//!
//! Grounded on `qc_manager::QCAggregator` — a `DashMap` keyed by signer,
//! guarding against double-counting the same signer twice — generalized
//! from "one block, one aggregator" to the three-level
//! `(period, kind) → hash → signers` index this core needs.

use crate::types::{Hash, NodeId, Vote, VoteKind};
use dashmap::DashMap;
use std::collections::HashSet;

type PeriodKind = (u64, VoteKind);

#[derive(Default)]
pub struct VoteStore {
    /// What block each signer has already been counted for, per (period, kind).
    /// Enforces that a given (signer, period, kind) contributes to at most
    /// one block_hash's tally.
    signer_choice: DashMap<PeriodKind, DashMap<NodeId, Hash>>,
    /// The actual tally: (period, kind) -> block_hash -> signers.
    tally: DashMap<PeriodKind, DashMap<Hash, HashSet<NodeId>>>,
}

impl VoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `vote`. Returns `true` if it was newly counted, `false` if it
    /// was a duplicate of an already-recorded vote from the same signer, or
    /// a conflicting vote from a signer who already voted for a different
    /// hash in this `(period, kind)` — conflicting votes are dropped, not
    /// counted.
    pub fn insert(&self, vote: &Vote) -> bool {
        let key = (vote.period, vote.kind);

        {
            let choices = self.signer_choice.entry(key).or_default();
            if choices.contains_key(&vote.proposer_id) {
                // Either a replay of a vote already counted, or a
                // conflicting vote for a different hash — either way it
                // must not be counted again.
                return false;
            }
            choices.insert(vote.proposer_id, vote.block_hash);
        }

        self.tally
            .entry(key)
            .or_default()
            .entry(vote.block_hash)
            .or_default()
            .insert(vote.proposer_id);
        true
    }

    pub fn count(&self, period: u64, kind: VoteKind, block_hash: Hash) -> usize {
        self.tally
            .get(&(period, kind))
            .and_then(|by_hash| by_hash.get(&block_hash).map(|signers| signers.len()))
            .unwrap_or(0)
    }

    pub fn has_quorum(&self, period: u64, kind: VoteKind, block_hash: Hash, threshold: usize) -> bool {
        self.count(period, kind, block_hash) >= threshold
    }

    /// Returns the first block hash (if any) with `>= threshold` votes of
    /// `kind` in `period`. Used by phases that only need to know "does some
    /// v clear quorum", such as Prepare's and Pass1's period p−1 carry
    /// checks.
    pub fn quorum_hash(&self, period: u64, kind: VoteKind, threshold: usize) -> Option<Hash> {
        self.tally.get(&(period, kind)).and_then(|by_hash| {
            by_hash
                .iter()
                .find(|entry| entry.value().len() >= threshold)
                .map(|entry| *entry.key())
        })
    }

    /// Like [`Self::quorum_hash`] but skips `exclude` — used by Confirm and
    /// Pass2 to look for a non-nil quorum without a split nil/non-nil tally
    /// being mistaken for each other.
    pub fn quorum_hash_excluding(
        &self,
        period: u64,
        kind: VoteKind,
        threshold: usize,
        exclude: Hash,
    ) -> Option<Hash> {
        self.tally.get(&(period, kind)).and_then(|by_hash| {
            by_hash
                .iter()
                .find(|entry| *entry.key() != exclude && entry.value().len() >= threshold)
                .map(|entry| *entry.key())
        })
    }

    /// Total distinct votes of any kind observed this period targeting
    /// `block_hash` — the "largest potential" ranking Ack uses.
    pub fn potential(&self, period: u64, block_hash: Hash) -> usize {
        [VoteKind::Ack, VoteKind::Confirm, VoteKind::Pass]
            .into_iter()
            .map(|kind| self.count(period, kind, block_hash))
            .sum()
    }

    /// Drops every period strictly older than `keep_from - 1`; Prepare,
    /// Pass1, and Pass2 all read carry facts from period p−1, so both p and
    /// p−1 must survive a GC pass.
    pub fn gc_before(&self, keep_from: u64) {
        let floor = keep_from.saturating_sub(1);
        self.signer_choice.retain(|(period, _), _| *period >= floor);
        self.tally.retain(|(period, _), _| *period >= floor);
    }
}
