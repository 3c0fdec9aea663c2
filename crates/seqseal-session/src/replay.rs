//! Replay tracking for received sequences.
//!
//! The engine is a pure function of its inputs and cannot tell a fresh
//! envelope from a replayed one. Receivers own that state here.

use std::collections::HashSet;

use crate::error::SessionError;

/// Smallest supported window, in sequences.
pub const MIN_WINDOW_SIZE: u32 = 64;

/// Largest supported window, in sequences.
pub const MAX_WINDOW_SIZE: u32 = 65_536;

/// Record of which sequences have been accepted.
pub trait ReplayGuard {
    /// Whether `sequence` must be rejected as already seen.
    fn seen(&self, sequence: u64) -> bool;

    /// Record `sequence` as accepted.
    ///
    /// Call only after the envelope authenticated, so forgeries cannot
    /// consume sequences.
    fn mark(&mut self, sequence: u64);

    /// Reject `sequence` with a descriptive error if it was seen.
    fn check(&self, sequence: u64) -> Result<(), SessionError> {
        if self.seen(sequence) {
            return Err(SessionError::Replayed { sequence });
        }
        Ok(())
    }
}

/// Sliding window configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Number of sequences tracked below the highest accepted one.
    ///
    /// Rounded up to a multiple of 64 and clamped to
    /// [`MIN_WINDOW_SIZE`]..=[`MAX_WINDOW_SIZE`].
    pub size: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { size: 1024 }
    }
}

/// Bitmap over the most recent `size` sequences.
///
/// Anything at or below `highest - size` is treated as seen. Arrivals inside
/// the window may come in any order.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    bits: Vec<u64>,
    size: u64,
    highest: Option<u64>,
}

impl SlidingWindow {
    /// Create an empty window.
    pub fn new(config: WindowConfig) -> Self {
        let size = config.size.clamp(MIN_WINDOW_SIZE, MAX_WINDOW_SIZE).div_ceil(64) * 64;
        Self { bits: vec![0; (size / 64) as usize], size: u64::from(size), highest: None }
    }

    /// Window size in sequences.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Highest accepted sequence, if any.
    pub fn highest(&self) -> Option<u64> {
        self.highest
    }

    /// Lowest sequence still tracked.
    pub fn floor(&self) -> u64 {
        self.highest.map_or(0, |highest| highest.saturating_sub(self.size - 1))
    }

    fn slot(&self, sequence: u64) -> (usize, u64) {
        let offset = sequence % self.size;
        ((offset / 64) as usize, 1u64 << (offset % 64))
    }

    fn test_bit(&self, sequence: u64) -> bool {
        let (word, mask) = self.slot(sequence);
        self.bits[word] & mask != 0
    }

    fn set_bit(&mut self, sequence: u64) {
        let (word, mask) = self.slot(sequence);
        self.bits[word] |= mask;
    }

    fn clear_bit(&mut self, sequence: u64) {
        let (word, mask) = self.slot(sequence);
        self.bits[word] &= !mask;
    }
}

impl Default for SlidingWindow {
    fn default() -> Self {
        Self::new(WindowConfig::default())
    }
}

impl ReplayGuard for SlidingWindow {
    fn seen(&self, sequence: u64) -> bool {
        match self.highest {
            None => false,
            Some(highest) if sequence > highest => false,
            Some(_) if sequence < self.floor() => true,
            Some(_) => self.test_bit(sequence),
        }
    }

    fn mark(&mut self, sequence: u64) {
        let Some(highest) = self.highest else {
            self.highest = Some(sequence);
            self.set_bit(sequence);
            return;
        };

        if sequence > highest {
            // Slots being reused for the new range still hold old sequences
            let advance = sequence - highest;
            if advance >= self.size {
                self.bits.fill(0);
            } else {
                for slot in highest + 1..=sequence {
                    self.clear_bit(slot);
                }
            }
            self.highest = Some(sequence);
        } else if sequence < self.floor() {
            return;
        }

        self.set_bit(sequence);
    }

    fn check(&self, sequence: u64) -> Result<(), SessionError> {
        let floor = self.floor();
        if self.highest.is_some() && sequence < floor {
            return Err(SessionError::TooOld { sequence, floor });
        }
        if self.seen(sequence) {
            return Err(SessionError::Replayed { sequence });
        }
        Ok(())
    }
}

/// Unbounded record of every accepted sequence.
///
/// Memory grows with the conversation; suited to tests and short exchanges.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    seen: HashSet<u64>,
}

impl SeenSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted sequences.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl ReplayGuard for SeenSet {
    fn seen(&self, sequence: u64) -> bool {
        self.seen.contains(&sequence)
    }

    fn mark(&mut self, sequence: u64) {
        self.seen.insert(sequence);
    }
}
