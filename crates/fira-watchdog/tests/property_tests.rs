//! Property-based tests for reset-cause classification and timeout bands.

#![cfg(test)]

use fira_watchdog::prelude::*;
use proptest::prelude::*;

fn priority(kind: ResetKind) -> u8 {
    match kind {
        ResetKind::Watchdog => 4,
        ResetKind::BrownOut => 3,
        ResetKind::External => 2,
        ResetKind::PowerOn => 1,
        ResetKind::Unknown => 0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The classified kind is always one of the flags present (or Unknown
    /// when none are) and no present flag outranks it.
    #[test]
    fn prop_classification_picks_highest_flag(raw in any::<u8>()) {
        let snapshot = ResetSnapshot::from_raw(raw);
        let kind = snapshot.kind();
        let present: Vec<ResetKind> = snapshot
            .cause()
            .iter()
            .map(ResetKind::classify)
            .collect();

        if present.is_empty() {
            prop_assert_eq!(kind, ResetKind::Unknown);
        } else {
            prop_assert!(present.contains(&kind));
            for other in present {
                prop_assert!(priority(other) <= priority(kind));
            }
        }
    }

    #[test]
    fn prop_watchdog_flag_dominates(raw in any::<u8>()) {
        let snapshot = ResetSnapshot::from_raw(raw | 0x08);
        prop_assert_eq!(snapshot.kind(), ResetKind::Watchdog);
        prop_assert!(snapshot.was_watchdog());
    }

    #[test]
    fn prop_latch_is_write_once(first in any::<u8>(), later in proptest::collection::vec(any::<u8>(), 0..8)) {
        let latch = ResetLatch::new();
        let held = latch.capture(|| first);
        for value in later {
            prop_assert_eq!(latch.capture(|| value), held);
        }
        prop_assert_eq!(held.raw(), first & 0x0F);
    }

    #[test]
    fn prop_only_ten_bands_exist(bits in any::<u8>()) {
        let parsed = WatchdogTimeout::try_from(bits);
        prop_assert_eq!(parsed.is_ok(), bits <= 9);
        if let Ok(timeout) = parsed {
            prop_assert_eq!(timeout.bits(), bits);
            prop_assert_eq!(WatchdogTimeout::from_wdtcsr(timeout.prescaler_bits()), Some(timeout));
        }
    }
}
