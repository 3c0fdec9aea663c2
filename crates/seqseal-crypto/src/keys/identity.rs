//! Identity generation: a secret fingerprint and its public verifier.
//!
//! The fingerprint is a 32-byte Ed25519 seed. The verifier is the Ed25519
//! verifying key for that seed, so it is a deterministic one-way function of
//! the fingerprint and regenerating it from the same fingerprint always
//! yields the same bytes.

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use zeroize::Zeroize;

use crate::{entropy::EntropySource, error::CryptoError};

/// Size of a fingerprint in bytes.
pub const FINGERPRINT_SIZE: usize = 32;

/// Size of a verifier in bytes.
pub const VERIFIER_SIZE: usize = 32;

/// Size of a sender signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// Secret identity material.
///
/// Owned exclusively by the caller that generated it. Never leaves the
/// process in cleartext; the engine only ever transmits signatures made
/// with it.
pub struct Fingerprint {
    seed: [u8; FINGERPRINT_SIZE],
}

impl Fingerprint {
    /// Wrap a 32-byte seed.
    ///
    /// # Security
    ///
    /// Only use bytes from a secure source.
    pub fn from_seed(seed: [u8; FINGERPRINT_SIZE]) -> Self {
        Self { seed }
    }

    /// Parse a fingerprint from a raw buffer, checking its length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; FINGERPRINT_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                kind: "fingerprint",
                expected: FINGERPRINT_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self { seed })
    }

    /// Raw seed bytes.
    ///
    /// # Security
    ///
    /// Handle with care - this exposes the secret identity.
    pub fn as_bytes(&self) -> &[u8; FINGERPRINT_SIZE] {
        &self.seed
    }

    /// Public verifier for this fingerprint.
    pub fn verifier(&self) -> Verifier {
        Verifier { key: self.signing_key().verifying_key() }
    }

    /// Sign `message` with this identity.
    ///
    /// Ed25519 signatures are deterministic, which keeps sealed envelopes
    /// reproducible for identical inputs.
    pub(crate) fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.signing_key().sign(message).to_bytes()
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed)
    }
}

impl Drop for Fingerprint {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint([REDACTED])")
    }
}

/// Public identity value derived from a [`Fingerprint`].
///
/// Safe to transmit. Receivers use it to bind key derivation to the sender
/// and to check the sender's signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Verifier {
    key: VerifyingKey,
}

impl Verifier {
    /// Parse a verifier, rejecting wrong lengths, invalid points and
    /// small-order (weak) keys.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; VERIFIER_SIZE] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                kind: "verifier",
                expected: VERIFIER_SIZE,
                actual: bytes.len(),
            })?;

        let key = VerifyingKey::from_bytes(&raw).map_err(|_| CryptoError::InvalidVerifier)?;
        if key.is_weak() {
            return Err(CryptoError::InvalidVerifier);
        }

        Ok(Self { key })
    }

    /// Verifier bytes.
    pub fn as_bytes(&self) -> &[u8; VERIFIER_SIZE] {
        self.key.as_bytes()
    }

    /// Convert to a byte array.
    pub fn to_bytes(&self) -> [u8; VERIFIER_SIZE] {
        self.key.to_bytes()
    }

    /// Check a sender signature over `message`.
    ///
    /// Uses strict verification so malleable encodings are rejected.
    pub(crate) fn verify(
        &self,
        message: &[u8],
        signature: &[u8; SIGNATURE_SIZE],
    ) -> Result<(), CryptoError> {
        let signature = Signature::from_bytes(signature);
        self.key.verify_strict(message, &signature).map_err(|_| CryptoError::AuthenticationFailed)
    }
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.as_bytes();
        write!(f, "Verifier({:02x}{:02x}{:02x}{:02x}..)", bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A freshly generated identity.
#[derive(Debug)]
pub struct IdentityPair {
    /// Secret identity material
    pub fingerprint: Fingerprint,
    /// Public value derived from `fingerprint`
    pub verifier: Verifier,
}

/// Generate a new identity from `entropy`.
///
/// Fails with [`CryptoError::EntropyUnavailable`] if the source cannot
/// produce bytes.
pub fn generate_fingerprint<E: EntropySource + ?Sized>(
    entropy: &E,
) -> Result<IdentityPair, CryptoError> {
    let mut seed = [0u8; FINGERPRINT_SIZE];
    entropy.fill(&mut seed)?;

    let fingerprint = Fingerprint::from_seed(seed);
    seed.zeroize();

    let verifier = fingerprint.verifier();
    Ok(IdentityPair { fingerprint, verifier })
}
