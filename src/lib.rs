//! Byzantine-fault-tolerant per-chain agreement core.
//!
//! A per-chain agreement state machine that drives validators, round by
//! round, through a five-phase voting protocol (Prepare, Ack, Confirm,
//! Pass1, Pass2) selecting at most one block per height among `n >= 3f+1`
//! participants. Cryptographic primitives, networking, block execution,
//! persistence, and the total-ordering layer above this core are all
//! external collaborators, consumed here as opaque traits and closures.
//!
//! # Module map
//!
//! - [`types`] — node identities, positions, blocks, votes, and the wire
//!   encoding votes are signed over.
//! - [`node_set`] — the validator set and its BFT sizing (`f`, quorum `T`).
//! - [`vote_store`] — the `(period, kind, hash) -> signers` quorum index.
//! - [`block_pool`] — candidate blocks proposed into the current agreement.
//! - [`agreement_data`] — period counter, default block, and the per-period
//!   scratch every phase reads and mutates.
//! - [`phases`] — the five-phase state machine itself.
//! - [`driver`] — [`driver::AgreementDriver`], which owns the phase, the
//!   shared data, and the three output streams.
//! - [`actor`] — an optional tokio task wrapping the driver for callers that
//!   would rather hand it votes/blocks/ticks over a channel.
//! - [`delivery`] — the non-blocking application delivery wrapper.
//! - [`elector`] — deterministic notary/witness/DKG subset election.
//! - [`crypto`] / [`proposer`] — the signing/recovery and block-proposer
//!   boundaries this core consumes as opaque interfaces.
//! - [`errors`] — [`errors::AgreementError`] and its propagation rules.

pub mod actor;
pub mod agreement_data;
pub mod block_pool;
pub mod crypto;
pub mod delivery;
pub mod driver;
pub mod elector;
pub mod errors;
pub mod node_set;
pub mod phases;
pub mod proposer;
pub mod types;
pub mod vote_store;

pub use agreement_data::AgreementData;
pub use block_pool::BlockPool;
pub use crypto::{sig_to_pub, Secp256k1Signer, Signer};
pub use delivery::{Application, NonBlockingDelivery};
pub use driver::{AgreementDriver, AgreementOutputs};
pub use elector::{dkg_set_target, elect_subset, notary_set_target, witness_set_target};
pub use errors::{AgreementError, Result};
pub use node_set::NodeSet;
pub use phases::PhaseKind;
pub use proposer::BlockProposer;
pub use types::{Block, Hash, NodeId, Position, Vote, VoteKind, WitnessAck};
pub use vote_store::VoteStore;
