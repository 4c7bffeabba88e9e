//! The signing/recovery boundary.
//!
//! Cryptographic primitives are an external collaborator — signing, key
//! recovery, and hashing are consumed as opaque interfaces, not implemented
//! here. `Signer` and [`sig_to_pub`] are that boundary made concrete: a
//! recoverable-signature scheme is required because the driver's
//! construction input is a `sig_to_pub(digest, signature) -> NodeId` hook
//! (recovering the signer's identity from the signature alone), which
//! plain `ed25519` cannot do. `secp256k1`'s ECDSA recovery (the scheme the
//! original Go implementation's `crypto/eth.SigToPub` wraps) is the natural
//! fit and is already the choice another repo in the retrieval pack
//! (`monarch-of-war-Blockchainframe`'s `chain` crate) makes for this exact
//! primitive.

use crate::types::{Hash, NodeId};
use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

/// Something that can sign a digest under this node's identity. Kept as a
/// trait so the agreement core never has to know whether keys live in a
/// software keystore, an HSM, or a test fixture.
pub trait Signer: Send + Sync {
    fn node_id(&self) -> NodeId;
    fn sign(&self, digest: &Hash) -> Vec<u8>;
}

/// A recovery function pointer, matching the External Interfaces
/// construction input `sig_to_pub(digest, signature) -> NodeID` verbatim.
pub type SigToPub = fn(&Hash, &[u8]) -> Option<NodeId>;

/// Default `secp256k1`-backed signer.
pub struct Secp256k1Signer {
    secret_key: SecretKey,
    node_id: NodeId,
}

impl Secp256k1Signer {
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let mut rng = rand::rngs::OsRng;
        let secret_key = SecretKey::new(&mut rng);
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            node_id: NodeId::from_public_key(&public_key.serialize()),
        }
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            node_id: NodeId::from_public_key(&public_key.serialize()),
        }
    }
}

impl Signer for Secp256k1Signer {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn sign(&self, digest: &Hash) -> Vec<u8> {
        let secp = Secp256k1::signing_only();
        let message = Message::from_digest(digest.0);
        let (recovery_id, sig_bytes) = secp
            .sign_ecdsa_recoverable(&message, &self.secret_key)
            .serialize_compact();

        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(&sig_bytes);
        out.push(recovery_id.to_i32() as u8);
        out
    }
}

/// Recovers the signer's [`NodeId`] from a 65-byte `(r, s, recovery_id)`
/// signature over `digest`. Returns `None` on any malformed input —
/// [`crate::driver::AgreementDriver::process_vote`] turns that into a
/// silently dropped `AgreementError::InvalidSignature`.
pub fn sig_to_pub(digest: &Hash, signature: &[u8]) -> Option<NodeId> {
    if signature.len() != 65 {
        return None;
    }
    let (compact, recovery_byte) = signature.split_at(64);
    let recovery_id = RecoveryId::from_i32(recovery_byte[0] as i32).ok()?;
    let recoverable = RecoverableSignature::from_compact(compact, recovery_id).ok()?;
    let message = Message::from_digest(digest.0);
    let secp = Secp256k1::verification_only();
    let public_key = secp.recover_ecdsa(&message, &recoverable).ok()?;
    Some(NodeId::from_public_key(&public_key.serialize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoteKind;

    #[test]
    fn sign_then_recover_round_trips_to_the_same_node() {
        let signer = Secp256k1Signer::generate();
        let block_hash = Hash([3u8; 32]);
        let bytes = crate::types::Vote::signing_bytes(
            signer.node_id(),
            VoteKind::Ack,
            block_hash,
            1,
        );
        let digest = Hash::keccak256(&[&bytes]);
        let signature = signer.sign(&digest);

        let recovered = sig_to_pub(&digest, &signature).expect("valid signature recovers");
        assert_eq!(recovered, signer.node_id());
    }

    #[test]
    fn malformed_signature_does_not_recover() {
        let digest = Hash([1u8; 32]);
        assert!(sig_to_pub(&digest, &[0u8; 10]).is_none());
    }
}
