//! Entropy sources for deterministic tests.
//!
//! Enabled by the `test-utils` feature. Never use these in production.

use std::{
    collections::VecDeque,
    sync::{Mutex, PoisonError},
};

use rand_chacha::{
    ChaCha20Rng,
    rand_core::{RngCore, SeedableRng},
};

use crate::{entropy::EntropySource, error::CryptoError};

/// Seeded ChaCha20 stream. Same seed, same keys.
pub struct SeededEntropy {
    rng: Mutex<ChaCha20Rng>,
}

impl SeededEntropy {
    /// Create from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)) }
    }
}

impl EntropySource for SeededEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner).fill_bytes(buf);
        Ok(())
    }
}

/// Source that always fails, simulating an exhausted or missing RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _buf: &mut [u8]) -> Result<(), CryptoError> {
        Err(CryptoError::EntropyUnavailable { reason: "test source always fails".to_string() })
    }
}

/// Replays scripted blocks, one per `fill` call.
///
/// Each block must match the requested length. Fails once the script is
/// exhausted.
pub struct FixedEntropy {
    blocks: Mutex<VecDeque<Vec<u8>>>,
}

impl FixedEntropy {
    /// Create from an ordered list of blocks.
    pub fn new(blocks: Vec<Vec<u8>>) -> Self {
        Self { blocks: Mutex::new(blocks.into()) }
    }
}

impl EntropySource for FixedEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let mut blocks = self.blocks.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(block) = blocks.pop_front() else {
            return Err(CryptoError::EntropyUnavailable {
                reason: "scripted entropy exhausted".to_string(),
            });
        };

        if block.len() != buf.len() {
            return Err(CryptoError::EntropyUnavailable {
                reason: format!("scripted block is {} bytes, need {}", block.len(), buf.len()),
            });
        }

        buf.copy_from_slice(&block);
        Ok(())
    }
}
