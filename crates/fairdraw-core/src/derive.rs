//! Centralized seed derivation.
//!
//! **ALL** hashing of caller-supplied seed material lives here. The
//! deterministic source never feeds a raw seed into its keystream; it goes
//! through these domain-separated SHA-256 derivations first.
//!
//! # Derivation chain
//!
//! ```text
//! (seed, label) → label_seed (only when label is non-empty) → key, nonce → ChaCha20
//! ```
//!
//! The prefixes below are part of the reproducibility contract. Changing any
//! of them changes every deterministic stream ever produced.

use sha2::{Digest, Sha256};

const LABEL_PREFIX: &[u8] = b"fairdraw deterministic source label ";
const KEY_PREFIX: &[u8] = b"fairdraw deterministic source ";

/// Purpose tag for a derived 32-byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    /// ChaCha20 key.
    Key,
    /// Stream selector (first 8 bytes are used).
    Nonce,
}

impl Purpose {
    fn tag(self) -> &'static [u8] {
        match self {
            Self::Key => b"key",
            Self::Nonce => b"nonce",
        }
    }
}

// ---------------------------------------------------------------------------
// Label separation
// ---------------------------------------------------------------------------

/// Fold a label into a seed: SHA-256(prefix || label || seed).
///
/// An empty label is the identity: the seed is returned unchanged, so the
/// unlabeled stream for a seed is the same whether or not `""` is passed.
pub fn label_seed(seed: &[u8], label: &str) -> Vec<u8> {
    if label.is_empty() {
        return seed.to_vec();
    }
    let mut h = Sha256::new();
    h.update(LABEL_PREFIX);
    h.update(label.as_bytes());
    h.update(seed);
    let digest: [u8; 32] = h.finalize().into();
    digest.to_vec()
}

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// Derive a 32-byte value for `purpose`: SHA-256(prefix || tag || seed).
pub fn derive(seed: &[u8], purpose: Purpose) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(KEY_PREFIX);
    h.update(purpose.tag());
    h.update(seed);
    h.finalize().into()
}

/// Derive the ChaCha20 key and stream id for a (seed, label) pair.
pub fn keystream_params(seed: &[u8], label: &str) -> ([u8; 32], u64) {
    let effective = label_seed(seed, label);
    let key = derive(&effective, Purpose::Key);
    let nonce = derive(&effective, Purpose::Nonce);
    let mut stream = [0u8; 8];
    stream.copy_from_slice(&nonce[..8]);
    (key, u64::from_le_bytes(stream))
}
