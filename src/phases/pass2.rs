//! Pass2: the escalation gates plus the period-advance decision.
//!
//! Grounded on `TestPass2State`: `on_vote` runs two at-most-once-per-period
//! gates (non-nil escalation, nil confirmation); `next_state` requires a
//! quorum of Pass votes for *any* single target (including nil) before
//! advancing to the next period's Prepare, and short-circuits to a no-op
//! Prepare transition once termination has been signaled.

use super::{PhaseContext, PhaseKind, Transition, VoteEvent};
use crate::errors::{AgreementError, Result};
use crate::types::{Hash, VoteKind};

pub(crate) fn on_vote(ctx: &PhaseContext<'_>) -> VoteEvent {
    let period = ctx.data.period();

    if let Some(v) =
        ctx.data
            .vote_store
            .quorum_hash_excluding(period, VoteKind::Ack, ctx.data.threshold, Hash::NIL)
    {
        if ctx.data.pass_emitted_nonnil() != Some(v) {
            ctx.data.record_pass_emitted_nonnil(v);
            return VoteEvent {
                vote: Some(ctx.sign_vote(VoteKind::Pass, v)),
                confirmed: None,
            };
        }
    }

    if period >= 2
        && ctx
            .data
            .vote_store
            .has_quorum(period - 1, VoteKind::Pass, Hash::NIL, ctx.data.threshold)
        && ctx.data.ack_emitted() == Some(Hash::NIL)
        && !ctx.data.pass_emitted_nil()
    {
        ctx.data.record_pass_emitted_nil();
        return VoteEvent {
            vote: Some(ctx.sign_vote(VoteKind::Pass, Hash::NIL)),
            confirmed: None,
        };
    }

    VoteEvent::default()
}

pub(crate) fn next_state(ctx: &PhaseContext<'_>) -> Result<Transition> {
    if ctx.data.is_terminated() {
        return Ok(Transition::to(PhaseKind::Prepare));
    }

    let period = ctx.data.period();
    match ctx
        .data
        .vote_store
        .quorum_hash(period, VoteKind::Pass, ctx.data.threshold)
    {
        None => Err(AgreementError::NotEnoughVotes),
        Some(_) => {
            ctx.data.advance_period();
            Ok(Transition::to(PhaseKind::Prepare))
        }
    }
}
