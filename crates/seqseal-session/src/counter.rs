//! Monotonic send counter.

use seqseal_crypto::MAX_SEQUENCE;

use crate::error::SessionError;

/// Hands out each sequence number exactly once, in increasing order.
///
/// # Invariants
///
/// - Returned sequences strictly increase
/// - No sequence above `max` is ever returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCounter {
    next: u64,
    max: u64,
    exhausted: bool,
}

impl SendCounter {
    /// Counter starting at 0.
    pub fn new() -> Self {
        Self::resume(0, MAX_SEQUENCE)
    }

    /// Counter resuming at `next`, bounded by `max`.
    ///
    /// `max` is clamped to the engine's [`MAX_SEQUENCE`].
    pub fn resume(next: u64, max: u64) -> Self {
        let max = max.min(MAX_SEQUENCE);
        Self { next, max, exhausted: next > max }
    }

    /// Next sequence that [`next`](Self::next) would return.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Largest sequence this counter will hand out.
    pub fn max(&self) -> u64 {
        self.max
    }

    /// Take the next sequence.
    ///
    /// # Errors
    ///
    /// - `SequenceExhausted`: every sequence up to `max` has been used
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<u64, SessionError> {
        if self.exhausted {
            return Err(SessionError::SequenceExhausted { last: self.max });
        }

        let sequence = self.next;
        if sequence == self.max {
            self.exhausted = true;
        } else {
            self.next += 1;
        }
        Ok(sequence)
    }
}

impl Default for SendCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_increments() {
        let mut counter = SendCounter::new();
        assert_eq!(counter.peek(), 0);
        assert_eq!(counter.next().unwrap(), 0);
        assert_eq!(counter.next().unwrap(), 1);
        assert_eq!(counter.peek(), 2);
    }

    #[test]
    fn resumes_from_given_value() {
        let mut counter = SendCounter::resume(41, 100);
        assert_eq!(counter.next().unwrap(), 41);
        assert_eq!(counter.peek(), 42);
    }

    #[test]
    fn exhausts_at_max() {
        let mut counter = SendCounter::resume(9, 10);
        assert_eq!(counter.next().unwrap(), 9);
        assert_eq!(counter.next().unwrap(), 10);
        assert_eq!(counter.next(), Err(SessionError::SequenceExhausted { last: 10 }));
        assert_eq!(counter.next(), Err(SessionError::SequenceExhausted { last: 10 }));
    }

    #[test]
    fn resume_past_max_is_exhausted() {
        let mut counter = SendCounter::resume(11, 10);
        assert!(counter.next().is_err());
    }

    #[test]
    fn max_is_clamped_to_engine_bound() {
        let mut counter = SendCounter::resume(MAX_SEQUENCE, u64::MAX);
        assert_eq!(counter.max(), MAX_SEQUENCE);
        assert_eq!(counter.next().unwrap(), MAX_SEQUENCE);
        assert!(counter.next().is_err());
    }
}
