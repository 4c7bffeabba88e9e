//! Votes: the unit of agreement between validators.

use super::{Hash, NodeId};
use serde::{Deserialize, Serialize};

/// The three vote kinds a phase can emit. Numeric values match the wire
/// encoding (`Ack=1, Confirm=2, Pass=3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteKind {
    Ack = 1,
    Confirm = 2,
    Pass = 3,
}

impl VoteKind {
    fn wire_byte(self) -> u8 {
        self as u8
    }
}

/// A signed vote for a block hash (or ⊥, `Hash::NIL`) in a given period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub proposer_id: NodeId,
    pub kind: VoteKind,
    pub block_hash: Hash,
    pub period: u64,
    pub signature: Vec<u8>,
}

impl Vote {
    /// Canonical encoding covered by the signature: `proposer_id (32) ||
    /// kind (1) || block_hash (32) || period (8, little-endian)`. The
    /// signature itself covers `keccak256` of this buffer (see
    /// `crypto::Signer`).
    pub fn signing_bytes(
        proposer_id: NodeId,
        kind: VoteKind,
        block_hash: Hash,
        period: u64,
    ) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32 + 1 + 32 + 8);
        buf.extend_from_slice(proposer_id.0.as_ref());
        buf.push(kind.wire_byte());
        buf.extend_from_slice(block_hash.as_ref());
        buf.extend_from_slice(&period.to_le_bytes());
        buf
    }

    pub fn digest(&self) -> Hash {
        let bytes = Self::signing_bytes(self.proposer_id, self.kind, self.block_hash, self.period);
        Hash::keccak256(&[&bytes])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_matches_layout() {
        let proposer = NodeId(Hash([7u8; 32]));
        let block_hash = Hash([9u8; 32]);
        let bytes = Vote::signing_bytes(proposer, VoteKind::Confirm, block_hash, 42);
        assert_eq!(bytes.len(), 32 + 1 + 32 + 8);
        assert_eq!(&bytes[0..32], proposer.0.as_ref());
        assert_eq!(bytes[32], 2);
        assert_eq!(&bytes[33..65], block_hash.as_ref());
        assert_eq!(&bytes[65..73], &42u64.to_le_bytes());
    }
}
