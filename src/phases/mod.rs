//! The five-phase agreement cycle: Prepare, Ack, Confirm, Pass1, Pass2.
//!
//! Modeled as a closed tagged variant rather than dynamic dispatch: the set
//! of phases is fixed and every transition is enumerable at compile time.
//! [`PhaseState`] is the tag plus the
//! clock-wait counter; the per-phase entry actions and vote hooks live in
//! one submodule each, grounded on the corresponding `TestXState` case in
//! `agreement-state_test.go`.

mod ack;
mod carry;
mod confirm;
mod pass1;
mod pass2;
mod prepare;

use crate::agreement_data::AgreementData;
use crate::crypto::Signer;
use crate::errors::Result;
use crate::proposer::BlockProposer;
use crate::types::{Hash, Vote, VoteKind};

/// The phase tag. Transitions always follow
/// `Prepare -> Ack -> Confirm -> Pass1 -> Pass2 -> Prepare` (next period).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Prepare,
    Ack,
    Confirm,
    Pass1,
    Pass2,
}

impl PhaseKind {
    /// Clock ticks this phase must wait through before `next_state` may be
    /// attempted. Pass2's dynamic wait-for-quorum is modeled as zero here:
    /// it retries `next_state` on every tick until quorum appears, which is
    /// the same observable behavior as a no-op wait.
    pub fn clocks(self) -> u32 {
        match self {
            PhaseKind::Prepare => 0,
            PhaseKind::Ack => 2,
            PhaseKind::Confirm => 2,
            PhaseKind::Pass1 => 0,
            PhaseKind::Pass2 => 0,
        }
    }
}

/// Everything a phase's entry action or vote hook needs: the shared
/// agreement data, the signing boundary, and the block-proposer boundary.
/// Built fresh by the driver for each call rather than stored, since it only
/// borrows.
pub(crate) struct PhaseContext<'a> {
    pub data: &'a AgreementData,
    pub signer: &'a dyn Signer,
    pub proposer: &'a dyn BlockProposer,
}

impl<'a> PhaseContext<'a> {
    /// Signs a fresh vote for `(kind, hash)` at the current period under
    /// this node's identity — the one path by which every self-emitted vote
    /// is constructed, so the wire format in the vote's `signing_bytes` is
    /// never duplicated ad hoc in a phase module.
    pub(crate) fn sign_vote(&self, kind: VoteKind, hash: Hash) -> Vote {
        let period = self.data.period();
        let proposer_id = self.data.self_id;
        let bytes = Vote::signing_bytes(proposer_id, kind, hash, period);
        let digest = Hash::keccak256(&[&bytes]);
        let signature = self.signer.sign(&digest);
        Vote {
            proposer_id,
            kind,
            block_hash: hash,
            period,
            signature,
        }
    }
}

/// What a phase's `next_state` produces: the next phase to move to, plus any
/// output the driver should forward — a proposed block hash (Prepare only)
/// or a self-signed vote (Ack/Pass1).
pub(crate) struct Transition {
    pub next: PhaseKind,
    pub block: Option<Hash>,
    pub vote: Option<Vote>,
}

impl Transition {
    fn to(next: PhaseKind) -> Self {
        Self {
            next,
            block: None,
            vote: None,
        }
    }
}

/// What a phase's `on_vote` fast-path hook produces. `confirmed` is set only
/// by Confirm's hook, the moment a quorum of Ack votes for a non-nil block
/// first appears — that is the decisive event the driver routes to the
/// confirmed-block output.
#[derive(Default)]
pub(crate) struct VoteEvent {
    pub vote: Option<Vote>,
    pub confirmed: Option<Hash>,
}

/// The driver's current phase: a tag plus the remaining clock-wait count.
pub struct PhaseState {
    kind: PhaseKind,
    remaining: u32,
}

impl PhaseState {
    pub fn new(kind: PhaseKind) -> Self {
        Self {
            kind,
            remaining: kind.clocks(),
        }
    }

    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    /// Decrements the wait counter on a clock tick. Returns `true` once it
    /// has reached zero, meaning `next_state` may now be attempted (and
    /// should be attempted again on every subsequent tick if it returns
    /// `NotEnoughVotes`).
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
        }
        self.remaining == 0
    }

    pub(crate) fn on_vote(&self, ctx: &PhaseContext<'_>) -> VoteEvent {
        match self.kind {
            PhaseKind::Confirm => confirm::on_vote(ctx),
            PhaseKind::Pass2 => pass2::on_vote(ctx),
            _ => VoteEvent::default(),
        }
    }

    pub(crate) fn next_state(&self, ctx: &PhaseContext<'_>) -> Result<Transition> {
        match self.kind {
            PhaseKind::Prepare => prepare::next_state(ctx),
            PhaseKind::Ack => ack::next_state(ctx),
            PhaseKind::Confirm => confirm::next_state(ctx),
            PhaseKind::Pass1 => pass1::next_state(ctx),
            PhaseKind::Pass2 => pass2::next_state(ctx),
        }
    }
}
