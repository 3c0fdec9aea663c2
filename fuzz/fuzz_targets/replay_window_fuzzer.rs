//! Fuzz target for the sliding replay window
//!
//! Drives a window with arbitrary mark/check sequences and compares it
//! against an unbounded set.
//!
//! # Invariants
//!
//! - A sequence accepted once is never accepted again
//! - At or above the floor, the window agrees with the unbounded model
//! - Below the floor, everything is rejected

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use seqseal_session::{ReplayGuard, SeenSet, SlidingWindow, WindowConfig};

#[derive(Debug, Clone, Arbitrary)]
struct WindowScenario {
    size: u16,
    base: u32,
    arrivals: Vec<u16>,
}

fuzz_target!(|scenario: WindowScenario| {
    let mut window = SlidingWindow::new(WindowConfig { size: u32::from(scenario.size) });
    let mut model = SeenSet::new();

    for offset in scenario.arrivals {
        let sequence = u64::from(scenario.base) + u64::from(offset);

        if window.check(sequence).is_ok() {
            assert!(!model.seen(sequence), "sequence {sequence} accepted twice");
            window.mark(sequence);
            model.mark(sequence);
        }

        let floor = window.floor();
        if sequence >= floor {
            assert_eq!(window.seen(sequence), model.seen(sequence));
        } else {
            assert!(window.seen(sequence));
        }
    }
});
