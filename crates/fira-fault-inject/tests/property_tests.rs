//! Property-based tests for the bit-flip pattern.

#![cfg(test)]

use fira_fault_inject::prelude::*;
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn prop_flip_is_an_involution(value in any::<u32>(), n in any::<u16>()) {
        prop_assert_eq!(apply_bit_flip(apply_bit_flip(value, n), n), value);
    }

    #[test]
    fn prop_flip_changes_one_bit_in_target_byte(value in any::<u32>(), n in any::<u16>()) {
        let (byte, bit) = bit_flip_target(n);
        let diff = apply_bit_flip(value, n) ^ value;
        prop_assert_eq!(diff.count_ones(), 1);
        prop_assert_eq!(diff.trailing_zeros(), u32::from(byte) * 8 + u32::from(bit));
        prop_assert_eq!(u16::from(byte), n % 4);
        prop_assert_eq!(u16::from(bit), n.wrapping_mul(7) % 8);
    }

    #[test]
    fn prop_interval_config_is_exact(seconds in 1u32..=4) {
        let config = FaultTimerConfig::for_interval(16_000_000, seconds);
        prop_assert!(config.is_ok());
        if let Ok(config) = config {
            let period = (u64::from(config.compare()) + 1) * u64::from(config.prescaler());
            prop_assert_eq!(period, 16_000_000 * u64::from(seconds));
        }
    }
}

/// Eight consecutive faults hit eight different bits.
#[quickcheck]
fn qc_consecutive_faults_hit_distinct_bits(start: u16) -> bool {
    let mut seen = 0_u32;
    for offset in 0..8_u16 {
        let (byte, bit) = bit_flip_target(start.wrapping_add(offset));
        seen |= 1 << (u32::from(byte) * 8 + u32::from(bit));
    }
    seen.count_ones() == 8
}

#[quickcheck]
fn qc_overlong_intervals_are_rejected(seconds: u32) -> bool {
    let result = FaultTimerConfig::for_interval(16_000_000, seconds);
    match seconds {
        0 => result == Err(FaultConfigError::ZeroInterval),
        1..=4 => result.is_ok(),
        _ => matches!(result, Err(FaultConfigError::IntervalTooLong { max_seconds: 4, .. })),
    }
}
