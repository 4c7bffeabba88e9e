//! Ack: vote for the candidate this node will try to get confirmed this
//! period.
//!
//! Grounded on `TestAckState`: period 1 (or a nil carry from period `p-1`)
//! picks the pool's largest-potential block; a non-nil carry votes for that
//! carried block directly.

use super::carry::{period_carry, Carry};
use super::{PhaseContext, PhaseKind, Transition};
use crate::errors::{AgreementError, Result};
use crate::types::{Hash, VoteKind};

pub(crate) fn next_state(ctx: &PhaseContext<'_>) -> Result<Transition> {
    let period = ctx.data.period();

    let candidate = if period == 1 {
        largest_potential(ctx)?
    } else {
        match period_carry(ctx, period) {
            None => return Err(AgreementError::NotEnoughVotes),
            Some(Carry::Nil) => largest_potential(ctx)?,
            Some(Carry::Block(v)) => v,
        }
    };

    ctx.data.record_ack_emitted(candidate);
    let vote = ctx.sign_vote(VoteKind::Ack, candidate);
    Ok(Transition {
        next: PhaseKind::Confirm,
        block: None,
        vote: Some(vote),
    })
}

/// Among blocks currently in the pool, the one with the most votes of any
/// kind observed this period targeting it; ties broken by lexicographic hash
/// order so every correct node lands on the same block given the same
/// observed vote set.
fn largest_potential(ctx: &PhaseContext<'_>) -> Result<Hash> {
    let period = ctx.data.period();
    let mut best: Option<(Hash, usize)> = None;
    for hash in ctx.data.block_pool.iter_hashes() {
        let score = ctx.data.vote_store.potential(period, hash);
        best = Some(match best {
            None => (hash, score),
            Some((best_hash, best_score)) => {
                if score > best_score || (score == best_score && hash < best_hash) {
                    (hash, score)
                } else {
                    (best_hash, best_score)
                }
            }
        });
    }
    best.map(|(hash, _)| hash)
        .ok_or(AgreementError::NotEnoughVotes)
}
