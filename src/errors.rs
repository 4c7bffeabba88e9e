//! Error types for the agreement core.

use crate::types::NodeId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgreementError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgreementError {
    #[error("signature from node {0} does not verify")]
    InvalidSignature(NodeId),

    #[error("signer {0} is not a member of the validator set")]
    UnknownSigner(NodeId),

    #[error("vote period {period} is outside the replay window (current {current})")]
    StaleVote { period: u64, current: u64 },

    #[error("not enough votes yet to advance the phase")]
    NotEnoughVotes,

    #[error("agreement instance has been terminated")]
    Terminated,
}

impl AgreementError {
    /// Quorum-gap errors are internal flow control: the driver retries on the
    /// next clock tick rather than surfacing them to the caller.
    pub fn is_flow_control(&self) -> bool {
        matches!(self, AgreementError::NotEnoughVotes)
    }

    /// Per-vote validation failures are expected Byzantine noise and are
    /// dropped silently by `process_vote`, never propagated.
    pub fn is_silent_drop(&self) -> bool {
        matches!(
            self,
            AgreementError::InvalidSignature(_)
                | AgreementError::UnknownSigner(_)
                | AgreementError::StaleVote { .. }
        )
    }
}
