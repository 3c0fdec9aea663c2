//! Sender and receiver halves of a one-directional conversation.
//!
//! The engine is stateless; these types hold the bookkeeping it leaves to
//! the application: the sender's monotonic counter and the receiver's replay
//! guard. Key material is owned here and only ever read by the engine.

use seqseal_crypto::{
    AgreementPrivateKey, AgreementPublicKey, Envelope, Fingerprint, Verifier, decrypt_message,
    encrypt_message,
};

use crate::{
    counter::SendCounter,
    error::SessionError,
    replay::{ReplayGuard, SlidingWindow},
};

/// An envelope ready for transport, with the sequence it was sealed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedMessage {
    /// Sequence used for this message
    pub sequence: u64,
    /// Encoded envelope bytes
    pub envelope: Vec<u8>,
}

/// Sending half.
///
/// # Invariants
///
/// - Every sealed message uses a fresh sequence, so no key and nonce pair is
///   ever reused
/// - A sequence is consumed even if sealing fails
#[derive(Debug)]
pub struct Outbox {
    fingerprint: Fingerprint,
    sender_private: AgreementPrivateKey,
    receiver_public: AgreementPublicKey,
    counter: SendCounter,
}

impl Outbox {
    /// Start a conversation at sequence 0.
    pub fn new(
        fingerprint: Fingerprint,
        sender_private: AgreementPrivateKey,
        receiver_public: AgreementPublicKey,
    ) -> Self {
        Self::with_counter(fingerprint, sender_private, receiver_public, SendCounter::new())
    }

    /// Continue a conversation with an existing counter.
    pub fn with_counter(
        fingerprint: Fingerprint,
        sender_private: AgreementPrivateKey,
        receiver_public: AgreementPublicKey,
        counter: SendCounter,
    ) -> Self {
        Self { fingerprint, sender_private, receiver_public, counter }
    }

    /// Sequence the next message will use.
    pub fn next_sequence(&self) -> u64 {
        self.counter.peek()
    }

    /// Seal `plaintext` at the next sequence.
    pub fn seal(&mut self, plaintext: &[u8]) -> Result<SealedMessage, SessionError> {
        let sequence = self.counter.next()?;
        let envelope = encrypt_message(
            sequence,
            &self.fingerprint,
            plaintext,
            &self.sender_private,
            &self.receiver_public,
        )?;

        Ok(SealedMessage { sequence, envelope: envelope.encode() })
    }
}

/// Receiving half.
///
/// Accepts each sequence at most once, in any order the guard allows.
#[derive(Debug)]
pub struct Inbox<G: ReplayGuard = SlidingWindow> {
    verifier: Verifier,
    sender_public: AgreementPublicKey,
    receiver_private: AgreementPrivateKey,
    guard: G,
}

impl Inbox<SlidingWindow> {
    /// Receive with the default sliding window.
    pub fn new(
        verifier: Verifier,
        sender_public: AgreementPublicKey,
        receiver_private: AgreementPrivateKey,
    ) -> Self {
        Self::with_guard(verifier, sender_public, receiver_private, SlidingWindow::default())
    }
}

impl<G: ReplayGuard> Inbox<G> {
    /// Receive with a custom replay guard.
    pub fn with_guard(
        verifier: Verifier,
        sender_public: AgreementPublicKey,
        receiver_private: AgreementPrivateKey,
        guard: G,
    ) -> Self {
        Self { verifier, sender_public, receiver_private, guard }
    }

    /// Replay guard state.
    pub fn guard(&self) -> &G {
        &self.guard
    }

    /// Open an encoded envelope.
    ///
    /// The declared sequence is checked against the guard before any
    /// cryptographic work, and marked only once the envelope authenticates.
    ///
    /// # Errors
    ///
    /// - `Replayed` / `TooOld`: sequence already accepted or out of range of
    ///   the guard
    /// - `Crypto`: malformed or unauthentic envelope
    pub fn open(&mut self, bytes: &[u8]) -> Result<Vec<u8>, SessionError> {
        let envelope = Envelope::decode(bytes)?;
        let sequence = envelope.sequence();

        if let Err(err) = self.guard.check(sequence) {
            tracing::warn!(sequence, "rejecting envelope: {}", err);
            return Err(err);
        }

        let plaintext = decrypt_message(
            sequence,
            &envelope,
            &self.verifier,
            &self.sender_public,
            &self.receiver_private,
        )
        .inspect_err(|err| tracing::warn!(sequence, "envelope failed to open: {}", err))?;

        self.guard.mark(sequence);
        Ok(plaintext)
    }
}
