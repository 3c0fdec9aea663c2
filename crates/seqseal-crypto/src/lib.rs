//! Seqseal Cryptographic Engine
//!
//! Stateless authenticated messaging between two parties. Every message key
//! is a pure function of a static Diffie-Hellman secret, the sender's
//! identity and an explicit sequence number, so neither side keeps ratchet
//! state and messages can be opened in any order.
//!
//! # Key Lifecycle
//!
//! ```text
//! Fingerprint ──────► Verifier (Ed25519 public key)
//!                        │
//! X25519(private, peer public)
//!        │               │
//!        ▼               ▼
//! HKDF(secret, salt = verifier, info = label || sequence)
//!        │
//!        ▼
//! Message Key + Nonce (one message only)
//!        │
//!        ▼
//! XChaCha20-Poly1305(signature || plaintext, aad) → Envelope
//! ```
//!
//! # Security
//!
//! Confidentiality and integrity:
//! - `XChaCha20-Poly1305` with a per-message key and nonce
//! - Associated data binds the declared sequence, the verifier and both
//!   public keys
//!
//! Sender authenticity:
//! - The sender signs `aad || plaintext` with its fingerprint
//! - A party holding only the DH keys cannot forge messages
//!
//! Sequence discipline:
//! - Encryption is deterministic; reusing a sequence for different plaintext
//!   reuses the key and nonce
//! - Tracking used sequences and rejecting replays is the caller's job; the
//!   engine cannot see across calls
//!
//! # Concurrency
//!
//! No shared mutable state. Key material is only read, so any number of
//! encrypt/decrypt calls can run in parallel on shared references.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod dh;
pub mod engine;
pub mod entropy;
pub mod error;
pub mod keys;
pub mod message;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dh::{decrypt_dh, encrypt_dh, encrypt_dh_at};
pub use engine::{Engine, EngineConfig};
pub use entropy::{EntropySource, OsEntropy};
pub use error::CryptoError;
pub use keys::{
    AgreementKeyPair, AgreementPrivateKey, AgreementPublicKey, Fingerprint, IdentityPair,
    SharedSecret, Verifier, generate_dh_keys, generate_fingerprint,
};
pub use message::{
    Envelope, IdentityMaterial, MAX_SEQUENCE, MessageKey, decrypt_message, derive_message_key,
    encrypt_message, open, seal,
};
