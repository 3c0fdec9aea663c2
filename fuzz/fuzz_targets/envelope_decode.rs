//! Fuzz target for Envelope::decode and decrypt_dh
//!
//! Feeds arbitrary bytes as an envelope to find:
//! - Parser crashes or panics
//! - Length arithmetic errors around the minimum envelope size
//! - Inputs that authenticate without a genuine sender
//!
//! The fuzzer should NEVER panic. All invalid inputs should return an error.

#![no_main]

use libfuzzer_sys::fuzz_target;
use seqseal_crypto::{decrypt_dh, AgreementPrivateKey, Envelope, Fingerprint};

fuzz_target!(|data: &[u8]| {
    if let Ok(envelope) = Envelope::decode(data) {
        // Decoding is lossless for anything it accepts
        assert_eq!(envelope.encode(), data, "decode/encode must be lossless");
    }

    let verifier = Fingerprint::from_seed([0x01; 32]).verifier();
    let Ok(sender) = AgreementPrivateKey::from_bytes(&[0x02; 32]) else {
        return;
    };
    let receiver = [0x03; 32];

    let sequence = data.get(..8).map_or(0, |header| {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(header);
        u64::from_be_bytes(bytes)
    });

    let result = decrypt_dh(
        sequence,
        data,
        verifier.as_bytes(),
        sender.public_key().as_bytes(),
        &receiver,
    );
    assert!(result.is_err(), "arbitrary bytes must never authenticate");
});
