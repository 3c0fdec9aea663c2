//! Property-based tests for the sealing pipeline
//!
//! These tests verify the fundamental invariants of the engine:
//!
//! 1. **Round-trip**: decrypt(encrypt(m)) == m for all keys, sequences and
//!    messages
//! 2. **Tamper detection**: any single flipped bit fails authentication
//! 3. **Sequence binding**: a genuine envelope never opens at another sequence
//! 4. **Determinism**: identical inputs give byte-identical envelopes
//! 5. **Identity binding**: a foreign verifier never opens an envelope

use std::collections::HashSet;

use proptest::prelude::*;
use seqseal_crypto::{
    AgreementKeyPair, AgreementPrivateKey, CryptoError, Fingerprint, IdentityMaterial,
    MAX_SEQUENCE, SharedSecret, Verifier, decrypt_dh, derive_message_key, encrypt_dh_at,
};

struct Parties {
    fingerprint: Fingerprint,
    verifier: Verifier,
    sender: AgreementKeyPair,
    receiver: AgreementKeyPair,
}

fn keypair(seed: [u8; 32]) -> AgreementKeyPair {
    let private = AgreementPrivateKey::from_bytes(&seed).unwrap();
    let public = private.public_key();
    AgreementKeyPair { private, public }
}

fn parties(identity: [u8; 32], sender: [u8; 32], receiver: [u8; 32]) -> Parties {
    let fingerprint = Fingerprint::from_seed(identity);
    let verifier = fingerprint.verifier();
    Parties { fingerprint, verifier, sender: keypair(sender), receiver: keypair(receiver) }
}

fn encrypt(p: &Parties, sequence: u64, plaintext: &[u8]) -> Vec<u8> {
    encrypt_dh_at(
        sequence,
        p.fingerprint.as_bytes(),
        plaintext,
        p.sender.private.as_bytes(),
        p.receiver.public.as_bytes(),
    )
    .unwrap()
}

fn decrypt(p: &Parties, sequence: u64, envelope: &[u8]) -> Result<Vec<u8>, CryptoError> {
    decrypt_dh(
        sequence,
        envelope,
        p.verifier.as_bytes(),
        p.sender.public.as_bytes(),
        p.receiver.private.as_bytes(),
    )
}

fn sequence_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![0u64..1_000, Just(MAX_SEQUENCE), 0..=MAX_SEQUENCE]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_encrypt_decrypt_roundtrip(
        identity in any::<[u8; 32]>(),
        sender in any::<[u8; 32]>(),
        receiver in any::<[u8; 32]>(),
        sequence in sequence_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..1000),
    ) {
        let p = parties(identity, sender, receiver);
        let envelope = encrypt(&p, sequence, &plaintext);

        prop_assert_eq!(decrypt(&p, sequence, &envelope)?, plaintext);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_single_bit_flip_fails(
        identity in any::<[u8; 32]>(),
        sequence in sequence_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let p = parties(identity, [0x11; 32], [0x22; 32]);
        let mut envelope = encrypt(&p, sequence, &plaintext);

        let index = position.index(envelope.len());
        envelope[index] ^= 1 << bit;

        prop_assert_eq!(decrypt(&p, sequence, &envelope), Err(CryptoError::AuthenticationFailed));
    }

    #[test]
    fn prop_wrong_sequence_never_opens(
        identity in any::<[u8; 32]>(),
        sequence in 0u64..1_000_000,
        other in 0u64..1_000_000,
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(sequence != other);
        let p = parties(identity, [0x33; 32], [0x44; 32]);
        let envelope = encrypt(&p, sequence, &plaintext);

        let result = decrypt(&p, other, &envelope);
        let rejected = matches!(
            result,
            Err(CryptoError::AuthenticationFailed | CryptoError::InvalidSequence { .. })
        );
        prop_assert!(rejected, "envelope sealed at {} opened at {}", sequence, other);
    }

    #[test]
    fn prop_encryption_deterministic(
        identity in any::<[u8; 32]>(),
        sender in any::<[u8; 32]>(),
        receiver in any::<[u8; 32]>(),
        sequence in sequence_strategy(),
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let p = parties(identity, sender, receiver);
        prop_assert_eq!(encrypt(&p, sequence, &plaintext), encrypt(&p, sequence, &plaintext));
    }

    #[test]
    fn prop_foreign_verifier_fails(
        identity in any::<[u8; 32]>(),
        stranger in any::<[u8; 32]>(),
        plaintext in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        prop_assume!(identity != stranger);
        let p = parties(identity, [0x55; 32], [0x66; 32]);
        let envelope = encrypt(&p, 0, &plaintext);
        let foreign = Fingerprint::from_seed(stranger).verifier();

        let result = decrypt_dh(
            0,
            &envelope,
            foreign.as_bytes(),
            p.sender.public.as_bytes(),
            p.receiver.private.as_bytes(),
        );
        prop_assert_eq!(result, Err(CryptoError::AuthenticationFailed));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_sequences_yield_unique_keys(
        secret in any::<[u8; 32]>(),
        identity in any::<[u8; 32]>(),
        start in 0u64..(MAX_SEQUENCE - 500),
    ) {
        let shared = SharedSecret::from_bytes(secret);
        let verifier = Fingerprint::from_seed(identity).verifier();
        let mut seen = HashSet::new();

        for sequence in start..start + 500 {
            let key = derive_message_key(&shared, IdentityMaterial::Verifier(&verifier), sequence)?;
            prop_assert!(
                seen.insert((*key.key(), *key.nonce())),
                "key/nonce collision at sequence {}",
                sequence
            );
        }
    }
}

#[test]
fn every_bit_of_an_envelope_is_authenticated() {
    let p = parties([0x01; 32], [0x02; 32], [0x03; 32]);
    let envelope = encrypt(&p, 5, b"hello world :)");

    for index in 0..envelope.len() {
        for bit in 0..8 {
            let mut tampered = envelope.clone();
            tampered[index] ^= 1 << bit;
            assert_eq!(
                decrypt(&p, 5, &tampered),
                Err(CryptoError::AuthenticationFailed),
                "flip at byte {index} bit {bit} was not detected"
            );
        }
    }
}

#[test]
fn truncated_or_extended_envelopes_fail() {
    let p = parties([0x04; 32], [0x05; 32], [0x06; 32]);
    let envelope = encrypt(&p, 0, b"payload");

    let mut extended = envelope.clone();
    extended.push(0);
    assert_eq!(decrypt(&p, 0, &extended), Err(CryptoError::AuthenticationFailed));

    let truncated = &envelope[..envelope.len() - 1];
    assert_eq!(decrypt(&p, 0, truncated), Err(CryptoError::AuthenticationFailed));

    let result = decrypt(&p, 0, &envelope[..10]);
    assert!(matches!(result, Err(CryptoError::MalformedEnvelope { .. })));
}
