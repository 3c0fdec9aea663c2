//! Property-based tests for sequence bookkeeping
//!
//! These tests verify:
//!
//! 1. **Exactly once**: inside the window, every sequence is accepted once in
//!    any arrival order
//! 2. **Model agreement**: the sliding window matches an unbounded set for
//!    every sequence at or above its floor
//! 3. **Delivery**: shuffled, duplicated delivery through `Outbox`/`Inbox`
//!    yields each plaintext once

use std::collections::HashSet;

use proptest::prelude::*;
use seqseal_crypto::{generate_dh_keys, generate_fingerprint, test_utils::SeededEntropy};
use seqseal_session::{
    Inbox, Outbox, ReplayGuard, SeenSet, SessionError, SlidingWindow, WindowConfig,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_window_accepts_each_sequence_once(
        order in Just((0u64..256).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let mut window = SlidingWindow::new(WindowConfig { size: 256 });

        for &sequence in &order {
            prop_assert!(window.check(sequence).is_ok(), "fresh sequence {} rejected", sequence);
            window.mark(sequence);
        }

        for &sequence in &order {
            prop_assert!(window.seen(sequence), "sequence {} not recorded", sequence);
        }
    }

    #[test]
    fn prop_window_matches_model(
        marks in prop::collection::vec(0u64..2_000, 1..300),
        probes in prop::collection::vec(0u64..2_100, 1..100),
    ) {
        let mut window = SlidingWindow::new(WindowConfig { size: 128 });
        let mut model = SeenSet::new();

        for &sequence in &marks {
            if window.check(sequence).is_ok() {
                window.mark(sequence);
                model.mark(sequence);
            }
        }

        let floor = window.floor();
        for &sequence in &probes {
            if sequence >= floor {
                prop_assert_eq!(
                    window.seen(sequence),
                    model.seen(sequence),
                    "disagreement at {} (floor {})",
                    sequence,
                    floor
                );
            } else {
                prop_assert!(window.seen(sequence), "below-floor {} must be rejected", sequence);
            }
        }
    }
}

/// Message count plus a shuffled delivery order that repeats some indices.
fn delivery_order() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..24)
        .prop_flat_map(|count| (Just(count), prop::collection::vec(0..count, 0..8)))
        .prop_flat_map(|(count, duplicates)| {
            let mut order: Vec<usize> = (0..count).collect();
            order.extend(duplicates);
            (Just(count), Just(order).prop_shuffle())
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_shuffled_delivery_is_exactly_once(
        seed in any::<u64>(),
        (count, order) in delivery_order(),
    ) {
        let entropy = SeededEntropy::new(seed);
        let identity = generate_fingerprint(&entropy)?;
        let sender = generate_dh_keys(&entropy, 1)?;
        let receiver = generate_dh_keys(&entropy, 1)?;

        let mut outbox = Outbox::new(identity.fingerprint, sender.private, receiver.public);
        let mut inbox = Inbox::new(identity.verifier, sender.public, receiver.private);

        let mut sealed = Vec::with_capacity(count);
        for i in 0..count {
            sealed.push(outbox.seal(format!("message {i}").as_bytes())?);
        }

        let mut accepted = HashSet::new();
        for message in order.iter().map(|&index| &sealed[index]) {
            match inbox.open(&message.envelope) {
                Ok(plaintext) => {
                    prop_assert_eq!(plaintext, format!("message {}", message.sequence).into_bytes());
                    prop_assert!(accepted.insert(message.sequence), "sequence accepted twice");
                },
                Err(SessionError::Replayed { sequence }) => {
                    prop_assert!(accepted.contains(&sequence));
                },
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        prop_assert_eq!(accepted.len(), count);
    }
}
