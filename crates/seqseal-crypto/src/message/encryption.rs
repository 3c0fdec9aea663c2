//! Authenticated encryption using `XChaCha20-Poly1305`.
//!
//! Both functions are pure. The nonce comes from the derived [`MessageKey`],
//! so sealing is deterministic: identical inputs give identical output.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit, Payload},
};

use super::derivation::MessageKey;
use crate::error::CryptoError;

/// Poly1305 tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Encrypt `plaintext`, binding the tag to `associated_data`.
///
/// Returns ciphertext followed by the 16-byte tag.
pub fn seal(message_key: &MessageKey, plaintext: &[u8], associated_data: &[u8]) -> Vec<u8> {
    let cipher = XChaCha20Poly1305::new(message_key.key().into());
    let nonce = XNonce::from_slice(message_key.nonce());

    let Ok(sealed) = cipher.encrypt(nonce, Payload { msg: plaintext, aad: associated_data })
    else {
        unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
    };

    sealed
}

/// Decrypt `sealed` and check its tag over the ciphertext and
/// `associated_data`.
///
/// The tag comparison is constant-time and no plaintext is released unless
/// it matches.
///
/// # Errors
///
/// - `AuthenticationFailed`: wrong key, tampered bytes or mismatched
///   associated data
pub fn open(
    message_key: &MessageKey,
    sealed: &[u8],
    associated_data: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(message_key.key().into());
    let nonce = XNonce::from_slice(message_key.nonce());

    cipher
        .decrypt(nonce, Payload { msg: sealed, aad: associated_data })
        .map_err(|_| CryptoError::AuthenticationFailed)
}
