//! X25519 key agreement.
//!
//! ## Security Notes
//!
//! - Private keys and shared secrets are zeroized on drop
//! - Generated keys whose public point has small order are rejected
//! - Agreements that produce a non-contributory secret are rejected, which
//!   covers peers that send a low-order public key

use std::fmt;

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::{entropy::EntropySource, error::CryptoError};

/// Size of an X25519 public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of an X25519 private key in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Size of a DH shared secret in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// Fixed scalar used to test a point for small order.
///
/// X25519 clamps every scalar to a multiple of the cofactor, so multiplying
/// any small-order point by it yields the all-zero output.
const LOW_ORDER_PROBE: [u8; PRIVATE_KEY_SIZE] = [0x5A; PRIVATE_KEY_SIZE];

/// Public half of an agreement keypair. Safe to share.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AgreementPublicKey {
    bytes: [u8; PUBLIC_KEY_SIZE],
}

impl AgreementPublicKey {
    /// Parse from a raw buffer, checking its length.
    ///
    /// Small-order points are accepted here and rejected at agreement time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; PUBLIC_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                kind: "public key",
                expected: PUBLIC_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.bytes
    }

    /// Convert to a byte array.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.bytes
    }

    /// Whether this point lies in the small-order subgroup.
    pub fn is_low_order(&self) -> bool {
        let probe = StaticSecret::from(LOW_ORDER_PROBE);
        !probe.diffie_hellman(&PublicKey::from(self.bytes)).was_contributory()
    }
}

impl fmt::Debug for AgreementPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgreementPublicKey({:02x}{:02x}..)", self.bytes[0], self.bytes[1])
    }
}

/// Private half of an agreement keypair.
///
/// Clone is not implemented so secret material is not duplicated by
/// accident. Share it across threads by reference; agreement only reads it.
pub struct AgreementPrivateKey {
    bytes: [u8; PRIVATE_KEY_SIZE],
}

impl AgreementPrivateKey {
    /// Parse from a raw buffer, checking its length.
    ///
    /// # Security
    ///
    /// Only use bytes from a secure source.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; PRIVATE_KEY_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                kind: "private key",
                expected: PRIVATE_KEY_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Raw key bytes.
    ///
    /// # Security
    ///
    /// Handle with care - this exposes the private key.
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.bytes
    }

    /// Corresponding public key.
    pub fn public_key(&self) -> AgreementPublicKey {
        let secret = StaticSecret::from(self.bytes);
        AgreementPublicKey { bytes: PublicKey::from(&secret).to_bytes() }
    }

    /// Diffie-Hellman agreement with `peer`.
    ///
    /// Symmetric: `a.diffie_hellman(b.public) == b.diffie_hellman(a.public)`.
    ///
    /// # Errors
    ///
    /// - `DegenerateKey`: the result is all-zero (peer key has small order)
    pub fn diffie_hellman(&self, peer: &AgreementPublicKey) -> Result<SharedSecret, CryptoError> {
        let secret = StaticSecret::from(self.bytes);
        let shared = secret.diffie_hellman(&PublicKey::from(peer.bytes));
        if !shared.was_contributory() {
            return Err(CryptoError::DegenerateKey { reason: "non-contributory shared secret" });
        }

        Ok(SharedSecret { bytes: shared.to_bytes() })
    }
}

impl Drop for AgreementPrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for AgreementPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgreementPrivateKey([REDACTED])")
    }
}

/// Output of a Diffie-Hellman agreement.
///
/// Lives only as long as one encrypt or decrypt call.
pub struct SharedSecret {
    bytes: [u8; SHARED_SECRET_SIZE],
}

impl SharedSecret {
    /// Wrap raw shared-secret bytes.
    ///
    /// Intended for callers that run agreement elsewhere; no contributory
    /// check is applied.
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self { bytes }
    }

    /// Secret bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.bytes
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedSecret([REDACTED])")
    }
}

/// A generated agreement keypair.
#[derive(Debug)]
pub struct AgreementKeyPair {
    /// Private key, owned by the generator's caller
    pub private: AgreementPrivateKey,
    /// Public key, shared with the peer
    pub public: AgreementPublicKey,
}

/// Generate an agreement keypair, retrying from fresh entropy at most
/// `attempts` times if a draw is degenerate.
///
/// # Errors
///
/// - `EntropyUnavailable`: the source failed (never retried)
/// - `DegenerateKey`: every attempt produced an unsafe key
pub fn generate_dh_keys<E: EntropySource + ?Sized>(
    entropy: &E,
    attempts: u32,
) -> Result<AgreementKeyPair, CryptoError> {
    for attempt in 1..=attempts.max(1) {
        let mut bytes = [0u8; PRIVATE_KEY_SIZE];
        entropy.fill(&mut bytes)?;

        let private = AgreementPrivateKey { bytes };
        bytes.zeroize();

        if let Some(reason) = degenerate_reason(&private) {
            tracing::warn!(attempt, reason, "discarding degenerate agreement key");
            continue;
        }

        let public = private.public_key();
        return Ok(AgreementKeyPair { private, public });
    }

    Err(CryptoError::DegenerateKey { reason: "key generation attempts exhausted" })
}

/// Reason a private key is unsafe to use, if any.
fn degenerate_reason(private: &AgreementPrivateKey) -> Option<&'static str> {
    // Uniform output of a healthy source essentially never produces these;
    // seeing one points at a broken source rather than bad luck.
    if private.bytes.iter().all(|&b| b == 0) || private.bytes.iter().all(|&b| b == 0xFF) {
        return Some("constant private key bytes");
    }

    let public = private.public_key();
    if public.bytes.iter().all(|&b| b == 0) || public.is_low_order() {
        return Some("public key in small-order subgroup");
    }

    None
}
