//! Prepare: propose (or re-propose) the block this node will ack.
//!
//! Grounded on `TestPrepareState` in `agreement-state_test.go`: period 1
//! proposes a fresh block; period >= 2 carries forward whatever period
//! `p-1`'s Pass quorum decided.

use super::carry::{period_carry, Carry};
use super::{PhaseContext, PhaseKind, Transition};
use crate::errors::{AgreementError, Result};

pub(crate) fn next_state(ctx: &PhaseContext<'_>) -> Result<Transition> {
    let period = ctx.data.period();

    let emitted = if period == 1 {
        let block = ctx.proposer.propose();
        let hash = block.hash;
        ctx.data.block_pool.insert(block);
        ctx.data.record_self_proposal(hash);
        hash
    } else {
        match period_carry(ctx, period) {
            None => return Err(AgreementError::NotEnoughVotes),
            Some(Carry::Nil) => ctx
                .data
                .self_proposal()
                .ok_or(AgreementError::NotEnoughVotes)?,
            Some(Carry::Block(v)) => {
                // Re-emitting a block not yet seen via `process_block` is
                // folded into `NotEnoughVotes`: the phase just waits for the
                // next tick instead of surfacing a distinct error.
                if !ctx.data.block_pool.contains(&v) {
                    return Err(AgreementError::NotEnoughVotes);
                }
                v
            }
        }
    };

    ctx.data.set_current_default_block(emitted);
    Ok(Transition {
        next: PhaseKind::Ack,
        block: Some(emitted),
        vote: None,
    })
}

#[cfg(test)]
mod tests {
    use crate::agreement_data::AgreementData;
    use crate::crypto::Secp256k1Signer;
    use crate::node_set::NodeSet;
    use crate::phases::{PhaseContext, PhaseKind};
    use crate::proposer::BlockProposer;
    use crate::types::{Block, Hash, NodeId, Vote, VoteKind};

    fn node(byte: u8) -> NodeId {
        NodeId(Hash([byte; 32]))
    }

    fn ctx_parts() -> (AgreementData, Secp256k1Signer, impl BlockProposer) {
        let validators = NodeSet::from_iter([node(1), node(2), node(3), node(4)]);
        let data = AgreementData::new(node(1), validators);
        let signer = Secp256k1Signer::generate();
        let proposer = move || Block::new(Hash([0xaa; 32]), node(1), vec![]);
        (data, signer, proposer)
    }

    fn pass_vote(signer: u8, hash: Hash, period: u64) -> Vote {
        Vote {
            proposer_id: node(signer),
            kind: VoteKind::Pass,
            block_hash: hash,
            period,
            signature: Vec::new(),
        }
    }

    #[test]
    fn period_one_proposes_a_fresh_block() {
        let (data, signer, proposer) = ctx_parts();
        let ctx = PhaseContext {
            data: &data,
            signer: &signer,
            proposer: &proposer,
        };
        let transition = super::next_state(&ctx).expect("period 1 always proposes");
        assert_eq!(transition.next, PhaseKind::Ack);
        assert_eq!(transition.block, Some(Hash([0xaa; 32])));
    }

    #[test]
    fn period_two_without_carry_is_not_enough_votes() {
        let (data, signer, proposer) = ctx_parts();
        data.advance_period(); // -> period 2, no period-1 Pass votes recorded
        let ctx = PhaseContext {
            data: &data,
            signer: &signer,
            proposer: &proposer,
        };
        let err = super::next_state(&ctx).unwrap_err();
        assert_eq!(err, crate::errors::AgreementError::NotEnoughVotes);
    }

    #[test]
    fn nil_carry_reemits_the_period_one_proposal() {
        let (data, signer, proposer) = ctx_parts();
        let ctx = PhaseContext {
            data: &data,
            signer: &signer,
            proposer: &proposer,
        };
        super::next_state(&ctx).unwrap(); // period 1 proposal, records self_proposal
        data.advance_period(); // -> period 2

        for v in [1u8, 2, 3] {
            data.vote_store.insert(&pass_vote(v, Hash::NIL, 1));
        }
        let transition = super::next_state(&ctx).unwrap();
        assert_eq!(transition.block, Some(Hash([0xaa; 32])));
        assert_eq!(transition.next, PhaseKind::Ack);
    }
}
