//! Candidate blocks proposed into an agreement instance.
//!
//! Block body validation and execution are external collaborators; this core
//! only ever looks at `hash` and `proposer_id`. `payload` is carried through
//! untouched and handed back to the application unmodified.

use super::{Hash, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: Hash,
    pub proposer_id: NodeId,
    pub payload: Vec<u8>,
}

impl Block {
    pub fn new(hash: Hash, proposer_id: NodeId, payload: Vec<u8>) -> Self {
        Self {
            hash,
            proposer_id,
            payload,
        }
    }
}
