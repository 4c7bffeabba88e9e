//! 32-byte digests and the node identities derived from them.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;

/// A 32-byte cryptographic digest (keccak256 unless noted otherwise).
///
/// `Ord` is lexicographic over the raw bytes; the ack phase's largest-potential
/// tie-break relies on this for a deterministic choice when two candidate
/// blocks have equal vote counts.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The all-zero digest, meaning "no block" (⊥) wherever a `Hash` is used
    /// as a vote target.
    pub const NIL: Hash = Hash([0u8; 32]);

    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn keccak256(parts: &[&[u8]]) -> Hash {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        Hash(hasher.finalize().into())
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", hex_prefix(&self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex_prefix(&self.0))
    }
}

fn hex_prefix(bytes: &[u8; 32]) -> String {
    bytes[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

/// A validator's identity: the keccak256 hash of its public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub Hash);

impl NodeId {
    pub fn from_public_key(pubkey_bytes: &[u8]) -> NodeId {
        NodeId(Hash::keccak256(&[pubkey_bytes]))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}
