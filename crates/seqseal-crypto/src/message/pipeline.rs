//! Sender and receiver pipelines.
//!
//! ```text
//! sender:   DH(sender_private, receiver_public)
//!             -> derive(secret, fingerprint, sequence)
//!             -> sign(aad || plaintext) -> seal -> Envelope
//!
//! receiver: DH(receiver_private, sender_public)
//!             -> derive(secret, verifier, sequence)
//!             -> open -> verify signature -> plaintext
//! ```
//!
//! Neither side keeps state between calls. The sequence number is the only
//! value that differs from one message to the next.

use zeroize::Zeroizing;

use super::{
    derivation::{IdentityMaterial, derive_message_key},
    encryption::{open, seal},
    envelope::{Envelope, associated_data},
};
use crate::{
    error::CryptoError,
    keys::{
        agreement::{AgreementPrivateKey, AgreementPublicKey},
        identity::{Fingerprint, SIGNATURE_SIZE, Verifier},
    },
};

/// Encrypt `plaintext` from the holder of `fingerprint` at `sequence`.
///
/// Deterministic: identical inputs yield identical envelopes. Callers MUST
/// NOT reuse a sequence for different plaintext under the same keys.
///
/// # Errors
///
/// - `InvalidSequence`: sequence above the supported maximum
/// - `DegenerateKey`: `receiver_public` has small order
pub fn encrypt_message(
    sequence: u64,
    fingerprint: &Fingerprint,
    plaintext: &[u8],
    sender_private: &AgreementPrivateKey,
    receiver_public: &AgreementPublicKey,
) -> Result<Envelope, CryptoError> {
    // Resolved once; derivation and associated data both bind to it
    let verifier = fingerprint.verifier();

    let shared_secret = sender_private.diffie_hellman(receiver_public)?;
    let message_key =
        derive_message_key(&shared_secret, IdentityMaterial::Verifier(&verifier), sequence)?;

    let aad = associated_data(sequence, &verifier, &sender_private.public_key(), receiver_public);

    let signature = fingerprint.sign(&signed_bytes(&aad, plaintext));

    let mut inner = Zeroizing::new(Vec::with_capacity(SIGNATURE_SIZE + plaintext.len()));
    inner.extend_from_slice(&signature);
    inner.extend_from_slice(plaintext);

    Ok(Envelope::new(sequence, seal(&message_key, &inner, &aad)))
}

/// Decrypt `envelope` at the caller-supplied `sequence`.
///
/// The key is derived from `sequence`, while the associated data covers the
/// sequence the envelope declares, so a mismatch between the two fails
/// authentication.
///
/// # Errors
///
/// - `InvalidSequence`: sequence above the supported maximum
/// - `DegenerateKey`: `sender_public` has small order
/// - `AuthenticationFailed`: tag or sender signature mismatch
pub fn decrypt_message(
    sequence: u64,
    envelope: &Envelope,
    verifier: &Verifier,
    sender_public: &AgreementPublicKey,
    receiver_private: &AgreementPrivateKey,
) -> Result<Vec<u8>, CryptoError> {
    let shared_secret = receiver_private.diffie_hellman(sender_public)?;
    let message_key =
        derive_message_key(&shared_secret, IdentityMaterial::Verifier(verifier), sequence)?;

    let aad = associated_data(
        envelope.sequence(),
        verifier,
        sender_public,
        &receiver_private.public_key(),
    );

    let inner = Zeroizing::new(open(&message_key, envelope.sealed(), &aad)?);
    if inner.len() < SIGNATURE_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    let (signature, plaintext) = inner.split_at(SIGNATURE_SIZE);
    let mut signature_bytes = [0u8; SIGNATURE_SIZE];
    signature_bytes.copy_from_slice(signature);

    verifier.verify(&signed_bytes(&aad, plaintext), &signature_bytes)?;

    Ok(plaintext.to_vec())
}

/// Bytes covered by the sender signature.
fn signed_bytes(aad: &[u8], plaintext: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(Vec::with_capacity(aad.len() + plaintext.len()));
    bytes.extend_from_slice(aad);
    bytes.extend_from_slice(plaintext);
    bytes
}
