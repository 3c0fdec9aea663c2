//! Per-message key derivation using HKDF.
//!
//! Replaces a stateful ratchet: the sequence number is an explicit input, so
//! any message key can be recomputed independently and messages may be
//! opened in any order.

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{
    error::CryptoError,
    keys::{
        agreement::SharedSecret,
        identity::{Fingerprint, VERIFIER_SIZE, Verifier},
    },
};

/// Label used for message key derivation
const MESSAGE_KEY_LABEL: &[u8] = b"seqseal/message-key/v1";

/// Largest sequence number accepted by derivation (2^48 - 1).
pub const MAX_SEQUENCE: u64 = (1 << 48) - 1;

/// Size of a message key in bytes.
pub const MESSAGE_KEY_SIZE: usize = 32;

/// Size of an `XChaCha20` nonce in bytes.
pub const NONCE_SIZE: usize = 24;

/// Identity value that binds derivation to a sender.
///
/// The sender holds the fingerprint and the receiver holds the verifier.
/// Both resolve to the verifier bytes, so the two sides derive the same key.
#[derive(Debug, Clone, Copy)]
pub enum IdentityMaterial<'a> {
    /// Sending side
    Fingerprint(&'a Fingerprint),
    /// Receiving side
    Verifier(&'a Verifier),
}

impl IdentityMaterial<'_> {
    /// Verifier bytes this material resolves to.
    pub fn binding(&self) -> [u8; VERIFIER_SIZE] {
        match self {
            Self::Fingerprint(fingerprint) => fingerprint.verifier().to_bytes(),
            Self::Verifier(verifier) => verifier.to_bytes(),
        }
    }
}

/// Symmetric key and nonce for exactly one message.
///
/// Never persisted. Zeroized on drop.
#[derive(Clone)]
pub struct MessageKey {
    key: [u8; MESSAGE_KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
    sequence: u64,
}

impl MessageKey {
    /// 32-byte symmetric key for `XChaCha20-Poly1305`.
    pub fn key(&self) -> &[u8; MESSAGE_KEY_SIZE] {
        &self.key
    }

    /// 24-byte nonce paired with this key.
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Sequence number this key was derived for.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl Drop for MessageKey {
    fn drop(&mut self) {
        self.key.zeroize();
        self.nonce.zeroize();
    }
}

impl fmt::Debug for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageKey")
            .field("key", &"[REDACTED]")
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

/// Derive the key and nonce for `sequence`.
///
/// HKDF-SHA256 with the DH secret as input key material, the identity
/// binding as salt, and `label || sequence` as info.
///
/// # Security
///
/// - Deterministic: same inputs always produce the same key and nonce
/// - Distinct sequences produce independent outputs under the same secret
///   and identity
/// - Reusing a sequence for different plaintext reuses the key and nonce;
///   preventing that is the caller's job
///
/// # Errors
///
/// - `InvalidSequence`: `sequence` exceeds [`MAX_SEQUENCE`]
pub fn derive_message_key(
    shared_secret: &SharedSecret,
    identity: IdentityMaterial<'_>,
    sequence: u64,
) -> Result<MessageKey, CryptoError> {
    if sequence > MAX_SEQUENCE {
        return Err(CryptoError::InvalidSequence { sequence, max: MAX_SEQUENCE });
    }

    let binding = identity.binding();
    let hkdf = Hkdf::<Sha256>::new(Some(binding.as_slice()), shared_secret.as_bytes());

    // Capacity: 22 (label) + 8 (sequence) = 30
    let mut info = Vec::with_capacity(MESSAGE_KEY_LABEL.len() + 8);
    info.extend_from_slice(MESSAGE_KEY_LABEL);
    info.extend_from_slice(&sequence.to_be_bytes());

    let mut okm = [0u8; MESSAGE_KEY_SIZE + NONCE_SIZE];
    let Ok(()) = hkdf.expand(&info, &mut okm) else {
        unreachable!("56 bytes is a valid HKDF-SHA256 output length");
    };

    let mut key = [0u8; MESSAGE_KEY_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    key.copy_from_slice(&okm[..MESSAGE_KEY_SIZE]);
    nonce.copy_from_slice(&okm[MESSAGE_KEY_SIZE..]);
    okm.zeroize();

    Ok(MessageKey { key, nonce, sequence })
}
