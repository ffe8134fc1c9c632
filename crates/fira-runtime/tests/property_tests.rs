//! Property-based tests for heartbeat corruption detection.

#![cfg(test)]

use fira_fault_inject::prelude::apply_bit_flip;
use fira_runtime::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A counter that only ever advances by one is never reported.
    #[test]
    fn prop_steady_counter_never_reported(start in any::<u32>(), beats in 1u32..500) {
        let mut monitor = HeartbeatMonitor::new(start);
        for i in 1..=beats {
            prop_assert!(!monitor.observe(start.wrapping_add(i), false).is_corrupted());
        }
        prop_assert_eq!(monitor.corruptions(), 0);
        prop_assert_eq!(monitor.beats(), beats);
    }

    /// Every injected bit flip is reported once, with the flipped bit as
    /// the magnitude of the deviation, and the monitor then resynchronizes.
    #[test]
    fn prop_bit_flip_reported_once(start in any::<u32>(), n in any::<u16>()) {
        let mut monitor = HeartbeatMonitor::new(start);
        let corrupted = apply_bit_flip(start, n).wrapping_add(1);
        let beat = monitor.observe(corrupted, true);

        let Beat::Corrupted { delta, fault_injected, .. } = beat else {
            return Err(TestCaseError::fail("bit flip not reported"));
        };
        prop_assert!(fault_injected);
        prop_assert_eq!(delta.unsigned_abs(), (start ^ apply_bit_flip(start, n)));
        prop_assert!(!monitor.observe(corrupted.wrapping_add(1), false).is_corrupted());
    }
}
