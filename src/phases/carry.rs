//! The period `p-1` carry fact Prepare, Ack, and Pass1 all read: did a
//! quorum of `Pass` votes land on nil, or on some specific block, in the
//! previous period?

use super::PhaseContext;
use crate::types::{Hash, VoteKind};

pub(crate) enum Carry {
    Nil,
    Block(Hash),
}

/// `None` means no quorum at all for period `p-1` yet — callers should
/// return `NotEnoughVotes`. Checking nil explicitly first (rather than just
/// taking whatever `quorum_hash` returns) keeps this correct even though in
/// practice BFT safety means only one outcome can ever reach quorum.
pub(crate) fn period_carry(ctx: &PhaseContext<'_>, period: u64) -> Option<Carry> {
    if period < 1 {
        return None;
    }
    let prev = period - 1;
    if ctx
        .data
        .vote_store
        .has_quorum(prev, VoteKind::Pass, Hash::NIL, ctx.data.threshold)
    {
        return Some(Carry::Nil);
    }
    ctx.data
        .vote_store
        .quorum_hash_excluding(prev, VoteKind::Pass, ctx.data.threshold, Hash::NIL)
        .map(Carry::Block)
}
