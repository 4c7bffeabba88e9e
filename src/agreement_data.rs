//! Shared agreement data: the period counter, default block, per-period
//! scratch flags, validator set, and this node's identity — everything every
//! phase reads and mutates, owned by the driver and handed to phases by
//! shared reference.

use crate::block_pool::BlockPool;
use crate::node_set::NodeSet;
use crate::types::{Hash, NodeId};
use crate::vote_store::VoteStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Per-period scratch: flags that gate "emit at most once per period"
/// behavior, reset on every period advance. `self_proposal` is the one
/// exception — it is this node's period-1 Prepare output, carried forward
/// indefinitely so later periods can re-emit it under a nil carry (see
/// DESIGN.md's resolution of the "proposed-this-period" naming ambiguity).
#[derive(Debug, Clone, Default)]
struct Scratch {
    period: u64,
    default_block: Hash,
    self_proposal: Option<Hash>,
    ack_emitted: Option<Hash>,
    confirm_emitted: Option<Hash>,
    pass_emitted_nonnil: Option<Hash>,
    pass_emitted_nil: bool,
}

pub struct AgreementData {
    pub self_id: NodeId,
    pub validators: NodeSet,
    pub threshold: usize,
    pub vote_store: VoteStore,
    pub block_pool: BlockPool,
    scratch: RwLock<Scratch>,
    terminated: AtomicBool,
    /// Guards `BlockConfirmed`'s "at most once per height" — unlike the
    /// `Scratch` fields this is never reset by `advance_period`: once a
    /// block is confirmed it is final for the whole agreement instance.
    confirmed: AtomicBool,
}

impl AgreementData {
    pub fn new(self_id: NodeId, validators: NodeSet) -> Self {
        let threshold = validators.quorum_threshold();
        let scratch = Scratch {
            period: 1,
            ..Default::default()
        };
        Self {
            self_id,
            validators,
            threshold,
            vote_store: VoteStore::new(),
            block_pool: BlockPool::new(),
            scratch: RwLock::new(scratch),
            terminated: AtomicBool::new(false),
            confirmed: AtomicBool::new(false),
        }
    }

    pub fn period(&self) -> u64 {
        self.scratch.read().unwrap().period
    }

    pub fn default_block(&self) -> Hash {
        self.scratch.read().unwrap().default_block
    }

    /// `default_block` may only change at period boundaries; callers must
    /// only invoke this from a phase's period-boundary entry action, never
    /// mid-period.
    pub fn set_current_default_block(&self, hash: Hash) {
        self.scratch.write().unwrap().default_block = hash;
    }

    pub fn self_proposal(&self) -> Option<Hash> {
        self.scratch.read().unwrap().self_proposal
    }

    pub fn record_self_proposal(&self, hash: Hash) {
        let mut scratch = self.scratch.write().unwrap();
        if scratch.self_proposal.is_none() {
            scratch.self_proposal = Some(hash);
        }
    }

    pub fn ack_emitted(&self) -> Option<Hash> {
        self.scratch.read().unwrap().ack_emitted
    }

    pub fn record_ack_emitted(&self, hash: Hash) {
        self.scratch.write().unwrap().ack_emitted = Some(hash);
    }

    pub fn confirm_emitted(&self) -> Option<Hash> {
        self.scratch.read().unwrap().confirm_emitted
    }

    pub fn record_confirm_emitted(&self, hash: Hash) {
        self.scratch.write().unwrap().confirm_emitted = Some(hash);
    }

    pub fn pass_emitted_nonnil(&self) -> Option<Hash> {
        self.scratch.read().unwrap().pass_emitted_nonnil
    }

    pub fn record_pass_emitted_nonnil(&self, hash: Hash) {
        self.scratch.write().unwrap().pass_emitted_nonnil = Some(hash);
    }

    pub fn pass_emitted_nil(&self) -> bool {
        self.scratch.read().unwrap().pass_emitted_nil
    }

    pub fn record_pass_emitted_nil(&self) {
        self.scratch.write().unwrap().pass_emitted_nil = true;
    }

    /// Advances to `period + 1` and resets the per-period gating flags.
    /// Called only from Pass2's `next_state` once ≥ T Pass votes exist for
    /// some target in the current period.
    pub fn advance_period(&self) {
        let mut scratch = self.scratch.write().unwrap();
        scratch.period += 1;
        scratch.ack_emitted = None;
        scratch.confirm_emitted = None;
        scratch.pass_emitted_nonnil = None;
        scratch.pass_emitted_nil = false;
    }

    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Returns `true` the first time this is called for this instance, and
    /// `false` on every subsequent call — `BlockConfirmed` fires at most
    /// once per agreement instance.
    pub fn try_mark_confirmed(&self) -> bool {
        self.confirmed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> AgreementData {
        let validators = NodeSet::from_iter((1..=4u8).map(|b| NodeId(Hash([b; 32]))));
        AgreementData::new(NodeId(Hash([1; 32])), validators)
    }

    #[test]
    fn starts_at_period_one_with_threshold_three() {
        let d = data();
        assert_eq!(d.period(), 1);
        assert_eq!(d.threshold, 3);
    }

    #[test]
    fn advance_period_resets_gating_flags_but_keeps_self_proposal() {
        let d = data();
        d.record_self_proposal(Hash([9; 32]));
        d.record_confirm_emitted(Hash([2; 32]));
        d.record_pass_emitted_nil();
        d.advance_period();

        assert_eq!(d.period(), 2);
        assert_eq!(d.self_proposal(), Some(Hash([9; 32])));
        assert_eq!(d.confirm_emitted(), None);
        assert!(!d.pass_emitted_nil());
    }

    #[test]
    fn confirmed_flag_fires_exactly_once() {
        let d = data();
        assert!(d.try_mark_confirmed());
        assert!(!d.try_mark_confirmed());
    }

    #[test]
    fn termination_is_level_triggered() {
        let d = data();
        assert!(!d.is_terminated());
        d.terminate();
        assert!(d.is_terminated());
        d.terminate();
        assert!(d.is_terminated());
    }
}
