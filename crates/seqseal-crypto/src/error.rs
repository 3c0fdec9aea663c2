//! Error taxonomy for the sealing engine.
//!
//! Every failure surfaces to the immediate caller as a typed result. The
//! engine never retries on its own, with one exception: key generation may
//! draw fresh entropy a bounded number of times when it lands on a
//! degenerate key.

use thiserror::Error;

/// Errors produced by identity generation, key agreement, derivation and
/// sealing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The secure random source could not produce bytes
    #[error("entropy unavailable: {reason}")]
    EntropyUnavailable {
        /// Description from the underlying source
        reason: String,
    },

    /// Generated or received key material is cryptographically unsafe
    #[error("degenerate key: {reason}")]
    DegenerateKey {
        /// Which check rejected the key
        reason: &'static str,
    },

    /// Sequence number is outside the supported range
    #[error("invalid sequence {sequence}: maximum is {max}")]
    InvalidSequence {
        /// Sequence supplied by the caller
        sequence: u64,
        /// Largest sequence accepted
        max: u64,
    },

    /// Tag or sender signature did not verify.
    ///
    /// Carries no detail on purpose: callers learn only that the envelope
    /// was rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// A raw key buffer had the wrong size
    #[error("invalid {kind} length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Which kind of key was being parsed
        kind: &'static str,
        /// Required length
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Verifier bytes are not a usable Ed25519 point
    #[error("invalid verifier")]
    InvalidVerifier,

    /// Envelope is too short to contain a header, signature and tag
    #[error("malformed envelope: {actual} bytes, need at least {minimum}")]
    MalformedEnvelope {
        /// Length supplied
        actual: usize,
        /// Smallest well-formed envelope
        minimum: usize,
    },
}

impl CryptoError {
    /// Returns true if the operation cannot proceed in this process state.
    ///
    /// Fatal errors come from the entropy source or from unsafe key
    /// material. Retrying them is an application policy decision.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EntropyUnavailable { .. } | Self::DegenerateKey { .. })
    }

    /// Returns true if the caller supplied out-of-range or mis-sized input.
    ///
    /// `AuthenticationFailed` is deliberately excluded: it may equally be
    /// active tampering.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSequence { .. }
                | Self::InvalidKeyLength { .. }
                | Self::InvalidVerifier
                | Self::MalformedEnvelope { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entropy_and_key_errors_are_fatal() {
        assert!(CryptoError::EntropyUnavailable { reason: "gone".to_string() }.is_fatal());
        assert!(CryptoError::DegenerateKey { reason: "low order" }.is_fatal());
    }

    #[test]
    fn caller_errors_are_not_fatal() {
        let errors = [
            CryptoError::InvalidSequence { sequence: 10, max: 5 },
            CryptoError::InvalidKeyLength { kind: "verifier", expected: 32, actual: 31 },
            CryptoError::InvalidVerifier,
            CryptoError::MalformedEnvelope { actual: 3, minimum: 88 },
        ];

        for err in errors {
            assert!(err.is_caller_error(), "{err} should be a caller error");
            assert!(!err.is_fatal(), "{err} should not be fatal");
        }
    }

    #[test]
    fn authentication_failure_is_neither() {
        let err = CryptoError::AuthenticationFailed;
        assert!(!err.is_fatal());
        assert!(!err.is_caller_error());
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn display_includes_bounds() {
        let err = CryptoError::InvalidSequence { sequence: 7, max: 3 };
        assert_eq!(err.to_string(), "invalid sequence 7: maximum is 3");
    }
}
