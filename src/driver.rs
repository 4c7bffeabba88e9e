//! Agreement driver: owns the current phase and the shared agreement data,
//! routes incoming votes and blocks, advances on clock ticks, and emits
//! outputs.
//!
//! The three entry points — [`AgreementDriver::process_vote`],
//! [`AgreementDriver::process_block`], [`AgreementDriver::tick`] — are the
//! only places phase transitions and emissions happen, matching the
//! concurrency model's "serialized... by design" requirement: nothing here
//! is `Send`-unsafe, but callers must not call these concurrently with each
//! other on the same driver (the `actor` module is the realization of that
//! serialization for a tokio caller).

use crate::agreement_data::AgreementData;
use crate::crypto::{Signer, SigToPub};
use crate::errors::{AgreementError, Result};
use crate::node_set::NodeSet;
use crate::phases::{PhaseContext, PhaseKind, PhaseState, Transition, VoteEvent};
use crate::proposer::BlockProposer;
use crate::types::{Block, Hash, NodeId, Vote};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Bounded output capacity: sized for one proposal plus a handful of votes
/// per period — a consumer that never drains fast enough to stay under this
/// is considered stuck, not a normal operating condition this core needs to
/// absorb.
const OUTPUT_CAPACITY: usize = 32;

/// How many periods old a vote may be and still be accepted: keeps the
/// current and immediately preceding period, matching the vote store's own
/// GC floor (Prepare/Ack/Pass1/Pass2 all read period `p-1` carry facts).
const REPLAY_WINDOW: u64 = 1;

/// The driver's three output streams, handed back from [`AgreementDriver::new`].
pub struct AgreementOutputs {
    pub block: mpsc::Receiver<Hash>,
    pub vote: mpsc::Receiver<Vote>,
    pub confirmed: mpsc::Receiver<Hash>,
}

pub struct AgreementDriver {
    data: Arc<AgreementData>,
    signer: Arc<dyn Signer>,
    sig_to_pub: SigToPub,
    proposer: Arc<dyn BlockProposer>,
    phase: PhaseState,
    block_tx: mpsc::Sender<Hash>,
    vote_tx: mpsc::Sender<Vote>,
    confirmed_tx: mpsc::Sender<Hash>,
}

impl AgreementDriver {
    pub fn new(
        self_id: NodeId,
        validators: NodeSet,
        signer: Arc<dyn Signer>,
        sig_to_pub: SigToPub,
        proposer: Arc<dyn BlockProposer>,
    ) -> (Self, AgreementOutputs) {
        let data = Arc::new(AgreementData::new(self_id, validators));
        let (block_tx, block_rx) = mpsc::channel(OUTPUT_CAPACITY);
        let (vote_tx, vote_rx) = mpsc::channel(OUTPUT_CAPACITY);
        let (confirmed_tx, confirmed_rx) = mpsc::channel(OUTPUT_CAPACITY);

        let driver = Self {
            data,
            signer,
            sig_to_pub,
            proposer,
            phase: PhaseState::new(PhaseKind::Prepare),
            block_tx,
            vote_tx,
            confirmed_tx,
        };
        let outputs = AgreementOutputs {
            block: block_rx,
            vote: vote_rx,
            confirmed: confirmed_rx,
        };
        (driver, outputs)
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn period(&self) -> u64 {
        self.data.period()
    }

    pub fn data(&self) -> &Arc<AgreementData> {
        &self.data
    }

    fn ctx(&self) -> PhaseContext<'_> {
        PhaseContext {
            data: &self.data,
            signer: self.signer.as_ref(),
            proposer: self.proposer.as_ref(),
        }
    }

    /// Validates `vote` (signature, membership, replay window), records it,
    /// and dispatches to the current phase's fast-path hook. Invalid votes
    /// are dropped silently — Byzantine input is expected, not exceptional.
    pub async fn process_vote(&mut self, vote: Vote) -> Result<()> {
        if self.data.is_terminated() {
            return Ok(());
        }
        if let Err(e) = self.validate_vote(&vote) {
            debug_assert!(e.is_silent_drop());
            warn!(signer = %vote.proposer_id, error = %e, "vote dropped");
            return Ok(());
        }
        if !self.data.vote_store.insert(&vote) {
            debug!(
                signer = %vote.proposer_id,
                period = vote.period,
                "duplicate or conflicting vote dropped"
            );
            return Ok(());
        }

        let event = self.phase.on_vote(&self.ctx());
        self.apply_vote_event(event).await
    }

    fn validate_vote(&self, vote: &Vote) -> std::result::Result<(), AgreementError> {
        if !self.data.validators.contains(&vote.proposer_id) {
            return Err(AgreementError::UnknownSigner(vote.proposer_id));
        }
        let bytes = Vote::signing_bytes(vote.proposer_id, vote.kind, vote.block_hash, vote.period);
        let digest = Hash::keccak256(&[&bytes]);
        match (self.sig_to_pub)(&digest, &vote.signature) {
            Some(recovered) if recovered == vote.proposer_id => {}
            _ => return Err(AgreementError::InvalidSignature(vote.proposer_id)),
        }
        let current = self.data.period();
        if vote.period + REPLAY_WINDOW < current {
            return Err(AgreementError::StaleVote {
                period: vote.period,
                current,
            });
        }
        Ok(())
    }

    /// Inserts `block` into the pool if its hash is new. Idempotent: feeding
    /// the same block twice is a no-op.
    pub async fn process_block(&mut self, block: Block) -> Result<()> {
        if self.data.is_terminated() {
            return Ok(());
        }
        self.data.block_pool.insert(block);
        Ok(())
    }

    /// Decrements the current phase's clock-wait count; once it reaches
    /// zero, attempts `next_state`. A `NotEnoughVotes` result leaves the
    /// phase unchanged to retry on the next tick. Returns
    /// `Err(Terminated)` once termination has been observed, after applying
    /// Pass2's no-op transition for this call.
    pub async fn tick(&mut self) -> Result<()> {
        if self.data.is_terminated() {
            return Err(AgreementError::Terminated);
        }
        if !self.phase.tick() {
            return Ok(());
        }

        match self.phase.next_state(&self.ctx()) {
            Ok(transition) => {
                self.apply_transition(transition).await?;
                if self.data.is_terminated() {
                    return Err(AgreementError::Terminated);
                }
                Ok(())
            }
            Err(AgreementError::NotEnoughVotes) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub fn terminate(&self) {
        self.data.terminate();
    }

    async fn apply_vote_event(&mut self, event: VoteEvent) -> Result<()> {
        if let Some(vote) = event.vote {
            self.emit_self_vote(vote).await?;
        }
        if let Some(hash) = event.confirmed {
            self.emit_confirmed(hash).await?;
        }
        Ok(())
    }

    async fn apply_transition(&mut self, transition: Transition) -> Result<()> {
        let from = self.phase.kind();
        if let Some(hash) = transition.block {
            self.block_tx
                .send(hash)
                .await
                .map_err(|_| AgreementError::Terminated)?;
        }

        let advanced_period = transition.next == PhaseKind::Prepare && from == PhaseKind::Pass2;
        self.phase = PhaseState::new(transition.next);
        info!(from = ?from, to = ?transition.next, period = self.data.period(), "phase transition");

        // A self-emitted vote must be run through the phase it lands in
        // (Ack's vote through Confirm::on_vote, Pass1's through
        // Pass2::on_vote), the same way process_vote dispatches peer votes.
        // Otherwise a quorum this vote itself just completed goes unnoticed
        // until some unrelated later vote happens to re-trigger on_vote.
        if let Some(vote) = transition.vote {
            self.emit_self_vote(vote).await?;
            let event = self.phase.on_vote(&self.ctx());
            self.apply_vote_event(event).await?;
        }

        if advanced_period {
            self.data.vote_store.gc_before(self.data.period());
        }
        Ok(())
    }

    async fn emit_self_vote(&mut self, vote: Vote) -> Result<()> {
        self.data.vote_store.insert(&vote);
        self.vote_tx
            .send(vote)
            .await
            .map_err(|_| AgreementError::Terminated)?;
        Ok(())
    }

    async fn emit_confirmed(&mut self, hash: Hash) -> Result<()> {
        if self.data.try_mark_confirmed() {
            info!(block = %hash, "block confirmed");
            self.confirmed_tx
                .send(hash)
                .await
                .map_err(|_| AgreementError::Terminated)?;
        }
        Ok(())
    }
}
