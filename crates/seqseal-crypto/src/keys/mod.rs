//! Long-lived key material: identities and agreement keypairs.
//!
//! These are the only components that consume entropy.

pub mod agreement;
pub mod identity;

pub use agreement::{
    AgreementKeyPair, AgreementPrivateKey, AgreementPublicKey, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE,
    SHARED_SECRET_SIZE, SharedSecret, generate_dh_keys,
};
pub use identity::{
    FINGERPRINT_SIZE, Fingerprint, IdentityPair, SIGNATURE_SIZE, VERIFIER_SIZE, Verifier,
    generate_fingerprint,
};
