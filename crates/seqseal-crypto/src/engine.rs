//! Explicit engine handle.
//!
//! Initialization is an explicit step rather than a side effect of loading
//! the crate: [`Engine::init`] checks the entropy source once and fixes the
//! configuration. Dropping the engine is teardown. The handle is `Send +
//! Sync` and holds no per-message state, so one engine can serve any number
//! of threads.

use zeroize::Zeroize;

use crate::{
    entropy::{EntropySource, OsEntropy},
    error::CryptoError,
    keys::{
        AgreementKeyPair, AgreementPrivateKey, AgreementPublicKey, Fingerprint, IdentityPair,
        Verifier, generate_dh_keys, generate_fingerprint,
    },
    message::{Envelope, MAX_SEQUENCE, decrypt_message, encrypt_message},
};

/// Default number of draws before key generation gives up.
pub const DEFAULT_KEYGEN_ATTEMPTS: u32 = 8;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest sequence this engine accepts.
    ///
    /// Clamped to [`MAX_SEQUENCE`]. Lower it to leave headroom for an
    /// application-level counter.
    pub max_sequence: u64,

    /// Fresh-entropy draws allowed when a generated agreement key is
    /// degenerate. Zero is treated as one.
    pub keygen_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_sequence: MAX_SEQUENCE, keygen_attempts: DEFAULT_KEYGEN_ATTEMPTS }
    }
}

/// Initialized engine.
pub struct Engine<E: EntropySource = OsEntropy> {
    entropy: E,
    config: EngineConfig,
}

impl Engine<OsEntropy> {
    /// Initialize against operating system entropy.
    pub fn init(config: EngineConfig) -> Result<Self, CryptoError> {
        Self::with_entropy(OsEntropy, config)
    }
}

impl<E: EntropySource> Engine<E> {
    /// Initialize against a caller-provided entropy source.
    ///
    /// # Errors
    ///
    /// - `EntropyUnavailable`: the source failed its initial draw
    pub fn with_entropy(entropy: E, config: EngineConfig) -> Result<Self, CryptoError> {
        let mut probe = [0u8; 32];
        let probed = entropy.fill(&mut probe);
        probe.zeroize();

        if let Err(err) = probed {
            tracing::error!("engine initialization failed: {}", err);
            return Err(err);
        }

        let config = EngineConfig {
            max_sequence: config.max_sequence.min(MAX_SEQUENCE),
            keygen_attempts: config.keygen_attempts.max(1),
        };

        tracing::debug!(
            max_sequence = config.max_sequence,
            keygen_attempts = config.keygen_attempts,
            "engine initialized"
        );

        Ok(Self { entropy, config })
    }

    /// Effective configuration after clamping.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a new identity.
    pub fn generate_fingerprint(&self) -> Result<IdentityPair, CryptoError> {
        generate_fingerprint(&self.entropy)
    }

    /// Generate a new agreement keypair.
    pub fn generate_dh_keys(&self) -> Result<AgreementKeyPair, CryptoError> {
        generate_dh_keys(&self.entropy, self.config.keygen_attempts)
    }

    /// Encrypt at `sequence`, enforcing the configured bound.
    pub fn encrypt(
        &self,
        sequence: u64,
        fingerprint: &Fingerprint,
        plaintext: &[u8],
        sender_private: &AgreementPrivateKey,
        receiver_public: &AgreementPublicKey,
    ) -> Result<Envelope, CryptoError> {
        self.check_sequence(sequence)?;
        encrypt_message(sequence, fingerprint, plaintext, sender_private, receiver_public)
    }

    /// Decrypt at `sequence`, enforcing the configured bound.
    pub fn decrypt(
        &self,
        sequence: u64,
        envelope: &Envelope,
        verifier: &Verifier,
        sender_public: &AgreementPublicKey,
        receiver_private: &AgreementPrivateKey,
    ) -> Result<Vec<u8>, CryptoError> {
        self.check_sequence(sequence)?;
        decrypt_message(sequence, envelope, verifier, sender_public, receiver_private).inspect_err(
            |err| tracing::debug!(sequence, "envelope rejected: {}", err),
        )
    }

    fn check_sequence(&self, sequence: u64) -> Result<(), CryptoError> {
        if sequence > self.config.max_sequence {
            return Err(CryptoError::InvalidSequence { sequence, max: self.config.max_sequence });
        }
        Ok(())
    }
}

impl<E: EntropySource> Drop for Engine<E> {
    fn drop(&mut self) {
        tracing::debug!("engine torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingEntropy, SeededEntropy};

    fn engine() -> Engine<SeededEntropy> {
        Engine::with_entropy(SeededEntropy::new(31), EngineConfig::default()).unwrap()
    }

    #[test]
    fn init_with_os_entropy() {
        let engine = Engine::init(EngineConfig::default()).unwrap();
        assert_eq!(engine.config(), &EngineConfig::default());
    }

    #[test]
    fn init_fails_without_entropy() {
        let result = Engine::with_entropy(FailingEntropy, EngineConfig::default());
        assert!(matches!(result, Err(CryptoError::EntropyUnavailable { .. })));
    }

    #[test]
    fn config_is_clamped() {
        let config = EngineConfig { max_sequence: u64::MAX, keygen_attempts: 0 };
        let engine = Engine::with_entropy(SeededEntropy::new(1), config).unwrap();

        assert_eq!(engine.config().max_sequence, MAX_SEQUENCE);
        assert_eq!(engine.config().keygen_attempts, 1);
    }

    #[test]
    fn engine_roundtrip() {
        let engine = engine();
        let identity = engine.generate_fingerprint().unwrap();
        let sender = engine.generate_dh_keys().unwrap();
        let receiver = engine.generate_dh_keys().unwrap();

        let envelope = engine
            .encrypt(7, &identity.fingerprint, b"payload", &sender.private, &receiver.public)
            .unwrap();
        let plaintext = engine
            .decrypt(7, &envelope, &identity.verifier, &sender.public, &receiver.private)
            .unwrap();

        assert_eq!(plaintext, b"payload");
    }

    #[test]
    fn configured_bound_is_enforced() {
        let config = EngineConfig { max_sequence: 10, ..EngineConfig::default() };
        let engine = Engine::with_entropy(SeededEntropy::new(2), config).unwrap();
        let identity = engine.generate_fingerprint().unwrap();
        let sender = engine.generate_dh_keys().unwrap();
        let receiver = engine.generate_dh_keys().unwrap();

        let envelope = engine
            .encrypt(10, &identity.fingerprint, b"ok", &sender.private, &receiver.public)
            .unwrap();

        let result =
            engine.encrypt(11, &identity.fingerprint, b"no", &sender.private, &receiver.public);
        assert_eq!(result.err(), Some(CryptoError::InvalidSequence { sequence: 11, max: 10 }));

        let result =
            engine.decrypt(11, &envelope, &identity.verifier, &sender.public, &receiver.private);
        assert_eq!(result, Err(CryptoError::InvalidSequence { sequence: 11, max: 10 }));

        // A genuine envelope above the configured bound is still rejected
        let unbounded = encrypt_message(
            11,
            &identity.fingerprint,
            b"no",
            &sender.private,
            &receiver.public,
        )
        .unwrap();
        let result =
            engine.decrypt(11, &unbounded, &identity.verifier, &sender.public, &receiver.private);
        assert_eq!(result, Err(CryptoError::InvalidSequence { sequence: 11, max: 10 }));
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<Engine<SeededEntropy>>();
    }
}
