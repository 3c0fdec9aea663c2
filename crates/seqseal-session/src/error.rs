//! Error types for the session layer.

use seqseal_crypto::CryptoError;
use thiserror::Error;

/// Errors from sequence bookkeeping and the sender/receiver halves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Engine rejected the operation
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Sequence was already accepted
    #[error("sequence {sequence} already received")]
    Replayed {
        /// Replayed sequence
        sequence: u64,
    },

    /// Sequence fell below the replay window and can no longer be checked
    #[error("sequence {sequence} is below the replay window floor {floor}")]
    TooOld {
        /// Rejected sequence
        sequence: u64,
        /// Lowest sequence still tracked
        floor: u64,
    },

    /// Send counter has no sequences left
    #[error("send counter exhausted after sequence {last}")]
    SequenceExhausted {
        /// Last sequence handed out
        last: u64,
    },
}

impl SessionError {
    /// Returns true if the envelope should be dropped silently.
    ///
    /// Replays and stale sequences are expected on lossy or duplicating
    /// transports and are not worth surfacing to the user.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Replayed { .. } | Self::TooOld { .. })
    }
}
