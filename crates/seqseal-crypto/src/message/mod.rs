//! Per-message key derivation, sealing and the envelope format.
//!
//! # Components
//!
//! - [`derivation`]: HKDF over (shared secret, identity, sequence)
//! - [`encryption`]: `XChaCha20-Poly1305` seal/open
//! - [`envelope`]: wire format and associated data
//! - [`pipeline`]: the full sender/receiver paths

pub mod derivation;
pub mod encryption;
pub mod envelope;
pub mod pipeline;

pub use derivation::{
    IdentityMaterial, MAX_SEQUENCE, MESSAGE_KEY_SIZE, MessageKey, NONCE_SIZE, derive_message_key,
};
pub use encryption::{TAG_SIZE, open, seal};
pub use envelope::{Envelope, MIN_ENVELOPE_SIZE, SEQUENCE_SIZE};
pub use pipeline::{decrypt_message, encrypt_message};
