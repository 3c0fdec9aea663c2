//! Ciphertext envelope wire format.
//!
//! ```text
//! +----------------+-------------------------------------+-----------+
//! | sequence (u64) | AEAD(signature[64] || plaintext)    | tag [16]  |
//! |  big-endian    |                                     |           |
//! +----------------+-------------------------------------+-----------+
//! ```
//!
//! The nonce is derived from the sequence and never transmitted. There is no
//! version byte: every header bit is covered by the associated data, so any
//! single-bit change to a well-sized envelope fails authentication.

use super::encryption::TAG_SIZE;
use crate::{
    error::CryptoError,
    keys::{
        agreement::{AgreementPublicKey, PUBLIC_KEY_SIZE},
        identity::{SIGNATURE_SIZE, VERIFIER_SIZE, Verifier},
    },
};

/// Size of the sequence header in bytes.
pub const SEQUENCE_SIZE: usize = 8;

/// Smallest well-formed envelope: header, signature and tag.
pub const MIN_ENVELOPE_SIZE: usize = SEQUENCE_SIZE + SIGNATURE_SIZE + TAG_SIZE;

/// Label prefixed to the associated data
const ENVELOPE_LABEL: &[u8] = b"seqseal/envelope/v1";

/// A sealed message with its declared sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    sequence: u64,
    sealed: Vec<u8>,
}

impl Envelope {
    /// Assemble an envelope from its parts.
    pub(crate) fn new(sequence: u64, sealed: Vec<u8>) -> Self {
        Self { sequence, sealed }
    }

    /// Sequence declared by the sender.
    ///
    /// Unauthenticated until the envelope is opened; receivers may use it to
    /// route or reject replays before doing cryptographic work.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Encrypted signature and plaintext, followed by the tag.
    pub fn sealed(&self) -> &[u8] {
        &self.sealed
    }

    /// Plaintext length (sealed length minus signature and tag).
    pub fn plaintext_len(&self) -> usize {
        self.sealed.len().saturating_sub(SIGNATURE_SIZE + TAG_SIZE)
    }

    /// Serialize to wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SEQUENCE_SIZE + self.sealed.len());
        bytes.extend_from_slice(&self.sequence.to_be_bytes());
        bytes.extend_from_slice(&self.sealed);
        bytes
    }

    /// Parse wire bytes.
    ///
    /// Only the shape is checked here; authenticity is established by
    /// opening.
    ///
    /// # Errors
    ///
    /// - `MalformedEnvelope`: fewer than [`MIN_ENVELOPE_SIZE`] bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_ENVELOPE_SIZE {
            return Err(CryptoError::MalformedEnvelope {
                actual: bytes.len(),
                minimum: MIN_ENVELOPE_SIZE,
            });
        }

        let (header, sealed) = bytes.split_at(SEQUENCE_SIZE);
        let mut sequence = [0u8; SEQUENCE_SIZE];
        sequence.copy_from_slice(header);

        Ok(Self { sequence: u64::from_be_bytes(sequence), sealed: sealed.to_vec() })
    }
}

/// Build the associated data authenticated alongside an envelope.
///
/// Layout: `label || sequence || verifier || sender_public ||
/// receiver_public`. Binding both public keys stops an envelope from being
/// replayed into a different pairing; binding the verifier stops sender
/// substitution.
pub(crate) fn associated_data(
    sequence: u64,
    verifier: &Verifier,
    sender_public: &AgreementPublicKey,
    receiver_public: &AgreementPublicKey,
) -> Vec<u8> {
    let mut aad = Vec::with_capacity(
        ENVELOPE_LABEL.len() + SEQUENCE_SIZE + VERIFIER_SIZE + 2 * PUBLIC_KEY_SIZE,
    );
    aad.extend_from_slice(ENVELOPE_LABEL);
    aad.extend_from_slice(&sequence.to_be_bytes());
    aad.extend_from_slice(verifier.as_bytes());
    aad.extend_from_slice(sender_public.as_bytes());
    aad.extend_from_slice(receiver_public.as_bytes());
    aad
}
