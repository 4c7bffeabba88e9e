//! Confirm: the fast-path phase. Unlike the others, its real work happens in
//! `on_vote` as soon as a quorum appears, not in `next_state` (which just
//! advances unconditionally once the clock wait elapses).
//!
//! Grounded on `TestConfirmState`: a quorum of Ack votes for a non-nil block
//! triggers exactly one Confirm vote per period — and this is also the
//! moment the driver's "confirmed block hash" output fires, since a quorum
//! of Acks is what decides the block for this height.

use super::{PhaseContext, PhaseKind, Transition, VoteEvent};
use crate::errors::Result;
use crate::types::{Hash, VoteKind};

pub(crate) fn on_vote(ctx: &PhaseContext<'_>) -> VoteEvent {
    if ctx.data.confirm_emitted().is_some() {
        return VoteEvent::default();
    }
    let period = ctx.data.period();
    match ctx
        .data
        .vote_store
        .quorum_hash_excluding(period, VoteKind::Ack, ctx.data.threshold, Hash::NIL)
    {
        Some(v) => {
            ctx.data.record_confirm_emitted(v);
            VoteEvent {
                vote: Some(ctx.sign_vote(VoteKind::Confirm, v)),
                confirmed: Some(v),
            }
        }
        None => VoteEvent::default(),
    }
}

pub(crate) fn next_state(_ctx: &PhaseContext<'_>) -> Result<Transition> {
    Ok(Transition::to(PhaseKind::Pass1))
}

#[cfg(test)]
mod tests {
    use crate::agreement_data::AgreementData;
    use crate::crypto::Secp256k1Signer;
    use crate::node_set::NodeSet;
    use crate::phases::PhaseContext;
    use crate::types::{Block, Hash, NodeId, Vote, VoteKind};

    fn node(byte: u8) -> NodeId {
        NodeId(Hash([byte; 32]))
    }

    fn ack_vote(signer: u8, hash: Hash, period: u64) -> Vote {
        Vote {
            proposer_id: node(signer),
            kind: VoteKind::Ack,
            block_hash: hash,
            period,
            signature: Vec::new(),
        }
    }

    #[test]
    fn quorum_of_acks_fires_exactly_one_confirm() {
        let validators = NodeSet::from_iter([node(1), node(2), node(3), node(4)]);
        let data = AgreementData::new(node(1), validators);
        let signer = Secp256k1Signer::generate();
        let proposer = || Block::new(Hash([9; 32]), node(1), vec![]);
        let ctx = PhaseContext {
            data: &data,
            signer: &signer,
            proposer: &proposer,
        };

        let block_hash = Hash([9; 32]);
        data.block_pool
            .insert(Block::new(block_hash, node(1), vec![]));

        data.vote_store.insert(&ack_vote(1, block_hash, 1));
        assert!(super::on_vote(&ctx).vote.is_none());

        data.vote_store.insert(&ack_vote(2, block_hash, 1));
        data.vote_store.insert(&ack_vote(3, block_hash, 1));
        let event = super::on_vote(&ctx);
        assert_eq!(event.vote.unwrap().kind, VoteKind::Confirm);
        assert_eq!(event.confirmed, Some(block_hash));

        // A second vote arriving after quorum must not re-fire.
        data.vote_store.insert(&ack_vote(4, block_hash, 1));
        let event = super::on_vote(&ctx);
        assert!(event.vote.is_none());
        assert!(event.confirmed.is_none());
    }
}
