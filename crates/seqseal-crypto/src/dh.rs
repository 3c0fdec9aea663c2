//! Byte-buffer boundary for host bindings.
//!
//! Mirrors the flat call surface a host environment sees: raw byte slices
//! in, raw bytes out. Every buffer is parsed into its typed form, with an
//! explicit length check, before any cryptographic work happens.

use crate::{
    error::CryptoError,
    keys::{AgreementPrivateKey, AgreementPublicKey, Fingerprint, Verifier},
    message::{Envelope, decrypt_message, encrypt_message},
};

/// Encrypt `plaintext` at sequence 0, the first message of a conversation.
///
/// The caller tracks the sequence and passes it to [`decrypt_dh`]. Later
/// messages use [`encrypt_dh_at`].
pub fn encrypt_dh(
    fingerprint: &[u8],
    plaintext: &[u8],
    sender_private: &[u8],
    receiver_public: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    encrypt_dh_at(0, fingerprint, plaintext, sender_private, receiver_public)
}

/// Encrypt `plaintext` at an explicit `sequence`.
pub fn encrypt_dh_at(
    sequence: u64,
    fingerprint: &[u8],
    plaintext: &[u8],
    sender_private: &[u8],
    receiver_public: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let fingerprint = Fingerprint::from_bytes(fingerprint)?;
    let sender_private = AgreementPrivateKey::from_bytes(sender_private)?;
    let receiver_public = AgreementPublicKey::from_bytes(receiver_public)?;

    let envelope =
        encrypt_message(sequence, &fingerprint, plaintext, &sender_private, &receiver_public)?;
    Ok(envelope.encode())
}

/// Decrypt an encoded envelope at `sequence`.
///
/// # Errors
///
/// - `InvalidSequence`: sequence above the supported maximum
/// - `AuthenticationFailed`: wrong sequence, keys or verifier, or tampering
/// - `InvalidKeyLength` / `InvalidVerifier` / `MalformedEnvelope`: bad
///   buffers
pub fn decrypt_dh(
    sequence: u64,
    envelope: &[u8],
    verifier: &[u8],
    sender_public: &[u8],
    receiver_private: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let verifier = Verifier::from_bytes(verifier)?;
    let sender_public = AgreementPublicKey::from_bytes(sender_public)?;
    let receiver_private = AgreementPrivateKey::from_bytes(receiver_private)?;
    let envelope = Envelope::decode(envelope)?;

    decrypt_message(sequence, &envelope, &verifier, &sender_public, &receiver_private)
}
