//! Property-based tests for register helpers and timer timing.

#![cfg(test)]

use fira_hal::atmega328p::*;
use fira_hal::prelude::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_modify_only_touches_masked_bits(initial in any::<u8>(), mask in any::<u8>(), value in any::<u8>()) {
        let board = SimBoard::new();
        let cpu = board.boot();
        cpu.write(OCR0A, initial);
        cpu.modify(OCR0A, mask, value);
        let result = cpu.read(OCR0A);
        prop_assert_eq!(result & !mask, initial & !mask);
        prop_assert_eq!(result & mask, value & mask);
    }

    #[test]
    fn prop_word_access_is_consistent(value in any::<u16>()) {
        let board = SimBoard::new();
        let cpu = board.boot();
        cpu.write_word(OCR1AL, OCR1AH, value);
        prop_assert_eq!(cpu.read_word(OCR1AL, OCR1AH), value);
    }

    #[test]
    fn prop_timer0_match_count_follows_period(ocr in 99u8..=255, ms in 1u32..50) {
        let board = SimBoard::new();
        let cpu = board.boot();
        cpu.write(TCCR0A, bit(TCCR0A_WGM01));
        cpu.write(OCR0A, ocr);
        cpu.write(TCCR0B, bit(TCCR0B_CS01) | bit(TCCR0B_CS00));
        cpu.write(TIMSK0, bit(TIMSK0_OCIE0A));

        let counter = std::cell::Cell::new(0_u64);
        let sink = Counter(&counter);
        cpu.attach(&sink);
        cpu.enable_interrupts();

        let start = board.elapsed_cycles();
        cpu.advance_ms(ms);
        let elapsed = board.elapsed_cycles() - start;
        let period = 64 * (u64::from(ocr) + 1);
        let expected = elapsed / period;
        // The setup writes land a few cycles before `start`.
        prop_assert!(counter.get() == expected || counter.get() == expected + 1);
    }
}

struct Counter<'a>(&'a std::cell::Cell<u64>);

impl InterruptSink for Counter<'_> {
    fn on_interrupt(&self, vector: Vector) {
        if vector == Vector::Timer0CompA {
            self.0.set(self.0.get() + 1);
        }
    }
}
