//! Fuzz target for the seal/open pipeline
//!
//! Tests the full sender and receiver paths under adversarial inputs.
//!
//! # Strategy
//!
//! - Arbitrary identities and agreement keys
//! - Boundary sequences (0, maximum, beyond maximum)
//! - Arbitrary plaintexts
//! - Bit flips and sequence substitutions on the sealed envelope
//!
//! # Invariants
//!
//! - Encryption is deterministic (same inputs → same envelope)
//! - Round-trip returns the original plaintext
//! - Any corrupted envelope fails with AuthenticationFailed
//! - Decrypting at a different sequence never succeeds
//! - Sequences beyond the maximum are rejected with InvalidSequence

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seqseal_crypto::{
    decrypt_dh, encrypt_dh_at, AgreementPrivateKey, CryptoError, Fingerprint, MAX_SEQUENCE,
};

#[derive(Debug, Clone, Arbitrary)]
struct SealScenario {
    identity: [u8; 32],
    sender: [u8; 32],
    receiver: [u8; 32],
    sequence: SequenceChoice,
    plaintext: Vec<u8>,
    corruptions: Vec<Corruption>,
}

#[derive(Debug, Clone, Arbitrary)]
enum SequenceChoice {
    Zero,
    Max,
    BeyondMax,
    Any(u64),
}

impl SequenceChoice {
    fn value(&self) -> u64 {
        match self {
            SequenceChoice::Zero => 0,
            SequenceChoice::Max => MAX_SEQUENCE,
            SequenceChoice::BeyondMax => MAX_SEQUENCE + 1,
            SequenceChoice::Any(value) => *value,
        }
    }
}

#[derive(Debug, Clone, Arbitrary)]
enum Corruption {
    /// Flip one bit at a position (wrapped to envelope length)
    FlipBit { position: u16, bit: u8 },
    /// Open at a different sequence
    ShiftSequence { delta: u64 },
}

fuzz_target!(|scenario: SealScenario| {
    let fingerprint = Fingerprint::from_seed(scenario.identity);
    let verifier = fingerprint.verifier();
    let (Ok(sender), Ok(receiver)) = (
        AgreementPrivateKey::from_bytes(&scenario.sender),
        AgreementPrivateKey::from_bytes(&scenario.receiver),
    ) else {
        return;
    };
    let sequence = scenario.sequence.value();

    let seal = || {
        encrypt_dh_at(
            sequence,
            fingerprint.as_bytes(),
            &scenario.plaintext,
            sender.as_bytes(),
            receiver.public_key().as_bytes(),
        )
    };
    let open = |sequence: u64, envelope: &[u8]| {
        decrypt_dh(
            sequence,
            envelope,
            verifier.as_bytes(),
            sender.public_key().as_bytes(),
            receiver.as_bytes(),
        )
    };

    // INVARIANT 1: Out-of-range sequences are rejected up front
    if sequence > MAX_SEQUENCE {
        assert!(matches!(seal(), Err(CryptoError::InvalidSequence { .. })));
        return;
    }

    let envelope = match seal() {
        Ok(envelope) => envelope,
        Err(err) => panic!("sealing with valid inputs failed: {err}"),
    };

    // INVARIANT 2: Deterministic
    assert_eq!(seal().ok(), Some(envelope.clone()), "encryption must be deterministic");

    // INVARIANT 3: Round-trip
    assert_eq!(open(sequence, &envelope).ok(), Some(scenario.plaintext.clone()));

    for corruption in scenario.corruptions {
        match corruption {
            Corruption::FlipBit { position, bit } => {
                // INVARIANT 4: Any flipped bit fails authentication
                let mut tampered = envelope.clone();
                let index = position as usize % tampered.len();
                tampered[index] ^= 1 << (bit % 8);
                assert_eq!(open(sequence, &tampered), Err(CryptoError::AuthenticationFailed));
            },
            Corruption::ShiftSequence { delta } => {
                // INVARIANT 5: Wrong sequence never opens
                let other = sequence.wrapping_add(delta);
                if other != sequence {
                    assert!(open(other, &envelope).is_err());
                }
            },
        }
    }
});
