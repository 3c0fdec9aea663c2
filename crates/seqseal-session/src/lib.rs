//! Seqseal Session Layer
//!
//! Application-side bookkeeping around the stateless engine. The engine
//! derives every message key from an explicit sequence number and cannot
//! detect reuse or replay across calls; this crate owns that state.
//!
//! # Components
//!
//! - [`SendCounter`]: monotonic sequence source for a sender
//! - [`ReplayGuard`]: receiver-side record of accepted sequences, with a
//!   bounded [`SlidingWindow`] and an unbounded [`SeenSet`]
//! - [`Outbox`] / [`Inbox`]: the two halves of a conversation, wiring the
//!   counter and guard to the engine
//!
//! # Invariants
//!
//! - A sender never seals two messages at the same sequence
//! - A receiver accepts each sequence at most once
//! - Only authenticated envelopes advance the replay guard

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod channel;
pub mod counter;
pub mod error;
pub mod replay;

pub use channel::{Inbox, Outbox, SealedMessage};
pub use counter::SendCounter;
pub use error::SessionError;
pub use replay::{ReplayGuard, SeenSet, SlidingWindow, WindowConfig};
