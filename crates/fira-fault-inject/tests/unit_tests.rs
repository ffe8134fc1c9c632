//! Unit tests for the fault injector on the simulated board.

#![cfg(test)]

use fira_hal::atmega328p::{OCR1AH, OCR1AL, TCCR1B, TIMSK1};
use fira_hal::prelude::*;
use fira_fault_inject::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

mod configuration {
    use super::*;

    #[test]
    fn test_init_programs_ctc_mode() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Safe> = FaultInjector::new(&cpu);

        let config = injector.init(3)?;

        assert_eq!(config.compare(), 46_874);
        assert_eq!(cpu.read_word(OCR1AL, OCR1AH), 46_874);
        assert_eq!(cpu.peek(TCCR1B), 0b0000_1101);
        assert_eq!(cpu.peek(TIMSK1), 0b0000_0010);
        assert!(injector.is_enabled());
        assert_eq!(injector.config(), Some(config));
        Ok(())
    }

    #[test]
    fn test_rejected_interval_leaves_timer_alone() {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Safe> = FaultInjector::new(&cpu);

        assert!(matches!(
            injector.init(10),
            Err(FaultConfigError::IntervalTooLong { seconds: 10, max_seconds: 4 })
        ));
        assert_eq!(injector.init(0), Err(FaultConfigError::ZeroInterval));
        assert_eq!(cpu.peek(TCCR1B), 0);
        assert_eq!(injector.config(), None);
    }

    #[test]
    fn test_disable_keeps_configuration() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Safe> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        cpu.enable_interrupts();

        cpu.advance_ms(1_500);
        assert_eq!(injector.get_count(), 1);

        injector.disable();
        assert!(!injector.is_enabled());
        assert_eq!(cpu.peek(TCCR1B) & 0b0000_1000, 0b0000_1000);
        cpu.advance_ms(5_000);
        assert_eq!(injector.get_count(), 1);

        injector.enable();
        assert!(injector.is_enabled());
        cpu.advance_ms(1_000);
        assert_eq!(injector.get_count(), 2);
        Ok(())
    }

    #[test]
    fn test_enable_before_init_does_nothing() {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Safe> = FaultInjector::new(&cpu);

        injector.enable();
        assert!(!injector.is_enabled());
    }
}

mod bookkeeping {
    use super::*;

    #[test]
    fn test_flag_is_consumed_once() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Safe> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        cpu.enable_interrupts();

        assert!(!injector.check_and_clear_flag());
        cpu.advance_ms(3_200);

        assert_eq!(injector.get_count(), 3);
        assert!(injector.check_and_clear_flag());
        assert!(!injector.check_and_clear_flag());
        assert_eq!(injector.last_outcome(), Some(FaultOutcome::Skipped));
        Ok(())
    }

    #[test]
    fn test_count_wraps_at_sixteen_bits() -> TestResult {
        // 1024 Hz core clock: one fault every 1024 cycles.
        let board = SimBoard::with_core_clock(1_024);
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Safe> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        cpu.enable_interrupts();

        cpu.advance_cycles(1_024 * 65_537 + 512);

        assert_eq!(injector.get_count(), 1);
        assert_eq!(
            cpu.interrupts_serviced(Vector::Timer1CompA),
            65_537
        );
        Ok(())
    }
}

mod attacks {
    use super::*;

    #[test]
    fn test_bit_flip_walks_victim() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let victim = VictimCell::new(0);
        let injector: FaultInjector<'_, _, BitFlip> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        injector.set_victim(Some(&victim));
        cpu.enable_interrupts();

        let mut expected = 0_u32;
        for n in 1..=4_u16 {
            cpu.advance_ms(1_000);
            expected = apply_bit_flip(expected, n);
            assert_eq!(victim.get(&cpu), expected);
        }
        assert_eq!(expected, (1 << 15) | (1 << 22) | (1 << 29) | (1 << 4));
        assert_eq!(
            injector.last_outcome(),
            Some(FaultOutcome::Flipped {
                byte: 0,
                bit: 4,
                before: (1 << 15) | (1 << 22) | (1 << 29),
                after: expected,
            })
        );
        Ok(())
    }

    #[test]
    fn test_bit_flip_without_victim_is_noop() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let victim = VictimCell::new(42);
        let injector: FaultInjector<'_, _, BitFlip> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        injector.set_victim(Some(&victim));
        injector.set_victim(None);
        assert!(injector.victim().is_none());
        cpu.enable_interrupts();

        cpu.advance_ms(1_100);

        assert_eq!(injector.get_count(), 1);
        assert_eq!(victim.get(&cpu), 42);
        assert_eq!(injector.last_outcome(), Some(FaultOutcome::NoVictim));
        Ok(())
    }

    #[test]
    fn test_redirect_restarts_without_flag() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, ControlRedirect> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        cpu.enable_interrupts();

        cpu.advance_ms(2_000);

        let event = board.pending_reset().ok_or("expected a restart")?;
        assert_eq!(event.source, ResetSource::SoftwareJump);
        assert_eq!(cpu.interrupts_serviced(Vector::Timer1CompA), 1);
        Ok(())
    }

    #[test]
    fn test_hang_starves_all_interrupts() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let injector: FaultInjector<'_, _, Hang> = FaultInjector::new(&cpu);
        cpu.attach(&injector);
        injector.init(1)?;
        cpu.enable_interrupts();

        cpu.advance_ms(1_000);
        assert!(cpu.is_halted());
        cpu.advance_ms(5_000);

        assert_eq!(cpu.interrupts_serviced(Vector::Timer1CompA), 1);
        assert!(!cpu.is_stopped(), "nothing but the watchdog can end a hang");
        assert_eq!(injector.mode(), AttackMode::Hang);
        Ok(())
    }
}
