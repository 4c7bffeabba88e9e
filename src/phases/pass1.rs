//! Pass1: first Pass-vote attempt for the period.
//!
//! Grounded on `TestPass1State`'s three branches: a Confirm already emitted
//! this period wins outright; otherwise a nil Pass quorum from `p-1`
//! combined with this node's own nil Ack falls through to nil; otherwise the
//! period's default block.

use super::{PhaseContext, PhaseKind, Transition};
use crate::errors::Result;
use crate::types::{Hash, VoteKind};

pub(crate) fn next_state(ctx: &PhaseContext<'_>) -> Result<Transition> {
    let period = ctx.data.period();

    let target = if let Some(v) = ctx.data.confirm_emitted() {
        v
    } else if period >= 2
        && ctx
            .data
            .vote_store
            .has_quorum(period - 1, VoteKind::Pass, Hash::NIL, ctx.data.threshold)
        && ctx.data.ack_emitted() == Some(Hash::NIL)
    {
        Hash::NIL
    } else {
        ctx.data.default_block()
    };

    if target.is_nil() {
        ctx.data.record_pass_emitted_nil();
    } else {
        ctx.data.record_pass_emitted_nonnil(target);
    }

    let vote = ctx.sign_vote(VoteKind::Pass, target);
    Ok(Transition {
        next: PhaseKind::Pass2,
        block: None,
        vote: Some(vote),
    })
}
