//! Property-based tests for the statistics record and availability.

#![cfg(test)]

use core::cell::Cell;

use fira_stats::layout::{CRASH_COUNT_ADDRESS, MAGIC_ADDRESS};
use fira_stats::prelude::*;
use fira_systick::Monotonic;
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

struct ManualClock(Cell<u32>);

impl Monotonic for ManualClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Counters written by one boot are what the next boot loads, and a
    /// corrupted marker brings back a zeroed record that itself round trips.
    #[test]
    fn prop_record_round_trips(crashes in 0u16..64, uptime in any::<u32>(), marker in any::<u16>()) {
        let eeprom = RamEeprom::new();
        let clock = ManualClock(Cell::new(0));
        {
            let stats = StatsStore::new(&eeprom, &clock, 2_000);
            stats.init();
            stats.session_start();
            for _ in 0..crashes {
                stats.record_crash();
            }
            clock.0.set(uptime);
            stats.flush_uptime();
        }

        let stats = StatsStore::new(&eeprom, &clock, 2_000);
        prop_assert_eq!(stats.init(), StatsOrigin::Restored);
        prop_assert_eq!(stats.crash_count(), crashes);
        prop_assert_eq!(stats.total_uptime(), uptime);

        prop_assume!(marker != 0xAA55);
        eeprom.write_word(MAGIC_ADDRESS, marker);
        let stats = StatsStore::new(&eeprom, &clock, 2_000);
        prop_assert_eq!(stats.init(), StatsOrigin::Reinitialized);
        let stats = StatsStore::new(&eeprom, &clock, 2_000);
        prop_assert_eq!(stats.init(), StatsOrigin::Restored);
        prop_assert_eq!(stats.crash_count(), 0);
        prop_assert_eq!(stats.total_uptime(), 0);
    }

    /// Persisting the same crash count twice programs the cells once.
    #[test]
    fn prop_update_is_idempotent(count in any::<u16>()) {
        let eeprom = RamEeprom::with_contents(CRASH_COUNT_ADDRESS, &count.wrapping_add(1).to_le_bytes());
        prop_assert!(eeprom.update_word(CRASH_COUNT_ADDRESS, count));
        prop_assert!(!eeprom.update_word(CRASH_COUNT_ADDRESS, count));
        prop_assert_eq!(eeprom.write_count(CRASH_COUNT_ADDRESS), 1);
        prop_assert_eq!(eeprom.write_count(CRASH_COUNT_ADDRESS + 1), 1);
        prop_assert_eq!(eeprom.read_word(CRASH_COUNT_ADDRESS), count);
    }

    #[test]
    fn prop_availability_bounded(uptime in any::<u64>(), crashes in any::<u16>(), cost in any::<u32>()) {
        prop_assert!(availability_percent(uptime, crashes, cost) <= 100);
    }
}

#[quickcheck]
fn qc_availability_non_increasing_in_crashes(uptime: u64, a: u16, b: u16) -> bool {
    let (fewer, more) = if a <= b { (a, b) } else { (b, a) };
    availability_percent(uptime, fewer, 2_000) >= availability_percent(uptime, more, 2_000)
}

#[quickcheck]
fn qc_no_crashes_is_full_availability(uptime: u64, cost: u32) -> bool {
    availability_percent(uptime, 0, cost) == 100
}
