//! Entropy abstraction for key generation.
//!
//! Decouples key generation from the operating system RNG so that tests can
//! drive it deterministically. Only the two generators consume entropy;
//! derivation and sealing are pure.

use crate::error::CryptoError;

/// Source of cryptographically secure random bytes.
///
/// # Invariants
///
/// - Production implementations MUST be backed by a CSPRNG
/// - A failed `fill` leaves no partially-trusted output: callers discard the
///   buffer
pub trait EntropySource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating system entropy via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::fill(buf)
            .map_err(|err| CryptoError::EntropyUnavailable { reason: err.to_string() })
    }
}

impl<E: EntropySource + ?Sized> EntropySource for &E {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        (**self).fill(buf)
    }
}
