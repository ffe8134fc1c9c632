//! Unit tests for the watchdog supervisor on the simulated board.

#![cfg(test)]

use fira_hal::atmega328p::{MCUSR, WDTCSR};
use fira_hal::prelude::*;
use fira_watchdog::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Bus that services an 8-cycle interrupt after every `WDTCSR` write, so
/// the second write of a timed sequence always lands too late.
struct InterruptedBus<'a> {
    cpu: &'a SimCpu<'a, 'a>,
}

impl RegisterBus for InterruptedBus<'_> {
    fn read(&self, reg: Register) -> u8 {
        self.cpu.read(reg)
    }

    fn write(&self, reg: Register, value: u8) {
        self.cpu.write(reg, value);
        if reg == WDTCSR {
            self.cpu.advance_cycles(8);
        }
    }
}

impl Cpu for InterruptedBus<'_> {
    fn core_clock_hz(&self) -> u32 {
        self.cpu.core_clock_hz()
    }

    fn watchdog_reset(&self) {
        self.cpu.watchdog_reset();
    }

    fn spin(&self) {
        self.cpu.spin();
    }

    fn halt(&self) {
        self.cpu.halt();
    }

    fn jump_to_reset(&self) {
        self.cpu.jump_to_reset();
    }
}

mod arming {
    use super::*;

    #[test]
    fn test_init_programs_requested_band() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let watchdog = Watchdog::new(&cpu, early_boot(&cpu, &ResetLatch::new()));

        for timeout in WatchdogTimeout::ALL {
            watchdog.init(timeout)?;
            assert_eq!(
                cpu.watchdog_timeout_ms(),
                Some(u64::from(timeout.as_millis()))
            );
            assert_eq!(
                WatchdogTimeout::from_wdtcsr(cpu.peek(WDTCSR)),
                Some(timeout)
            );
            assert_eq!(watchdog.timeout(), Some(timeout));
        }
        assert_eq!(watchdog.metrics().arm_count, 10);
        Ok(())
    }

    #[test]
    fn test_init_restores_interrupt_state() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let watchdog = Watchdog::new(&cpu, ResetSnapshot::default());

        cpu.enable_interrupts();
        watchdog.init(WatchdogTimeout::S1)?;
        assert!(cpu.interrupts_enabled());
        Ok(())
    }

    #[test]
    fn test_late_second_write_is_reported() {
        let board = SimBoard::new();
        let cpu = board.boot();
        let bus = InterruptedBus { cpu: &cpu };
        let watchdog = Watchdog::new(&bus, ResetSnapshot::default());

        let result = watchdog.init(WatchdogTimeout::S2);

        assert_eq!(
            result,
            Err(WatchdogError::SequenceRejected {
                expected: 0b0000_1111,
                actual: 0b0000_1000,
            })
        );
        assert_eq!(watchdog.status(), WatchdogStatus::Uninitialized);
        assert_eq!(watchdog.metrics().rejected_count, 1);
    }

    #[test]
    fn test_late_disable_is_reported() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        Watchdog::new(&cpu, ResetSnapshot::default()).init(WatchdogTimeout::S1)?;

        let bus = InterruptedBus { cpu: &cpu };
        let watchdog = Watchdog::new(&bus, ResetSnapshot::default());
        let result = watchdog.disable();

        assert!(matches!(
            result,
            Err(WatchdogError::SequenceRejected { expected: 0, .. })
        ));
        assert_eq!(cpu.watchdog_timeout_ms(), Some(1_000));
        Ok(())
    }

    #[test]
    fn test_disable_stops_countdown() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let watchdog = Watchdog::new(&cpu, ResetSnapshot::default());

        watchdog.init(WatchdogTimeout::Ms64)?;
        watchdog.disable()?;
        cpu.advance_ms(500);

        assert_eq!(watchdog.status(), WatchdogStatus::Disabled);
        assert!(!cpu.is_stopped());
        assert_eq!(cpu.watchdog_timeout_ms(), None);
        Ok(())
    }
}

mod kicking {
    use super::*;

    #[test]
    fn test_regular_kicks_prevent_reset() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let watchdog = Watchdog::new(&cpu, ResetSnapshot::default());
        watchdog.init(WatchdogTimeout::Ms250)?;

        for _ in 0..40 {
            cpu.advance_ms(100);
            watchdog.kick();
        }

        assert!(!cpu.is_stopped());
        assert_eq!(watchdog.metrics().kick_count, 40);
        Ok(())
    }

    #[test]
    fn test_missed_kick_resets() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let watchdog = Watchdog::new(&cpu, ResetSnapshot::default());
        watchdog.init(WatchdogTimeout::Ms250)?;

        cpu.advance_ms(200);
        watchdog.kick();
        cpu.advance_ms(300);

        let event = board.pending_reset().ok_or("expected a watchdog reset")?;
        assert_eq!(event.source, ResetSource::Watchdog);
        Ok(())
    }

    #[test]
    fn test_force_reset_takes_shortest_band() -> TestResult {
        let board = SimBoard::new();
        let cpu = board.boot();
        let watchdog = Watchdog::new(&cpu, ResetSnapshot::default());
        watchdog.init(WatchdogTimeout::S8)?;

        watchdog.force_reset();
        assert!(cpu.is_halted());

        let event = cpu.run(100, || {}).ok_or("expected a watchdog reset")?;
        assert_eq!(event.source, ResetSource::Watchdog);
        let ms = (event.at_cycle - event.last_kick_cycle) / board.cycles_per_ms();
        assert_eq!(ms, 16);
        Ok(())
    }
}

mod early_boot_hook {
    use super::*;

    #[test]
    fn test_power_on_boot() {
        let board = SimBoard::new();
        let cpu = board.boot();
        let snapshot = early_boot(&cpu, &ResetLatch::new());

        assert_eq!(snapshot.kind(), ResetKind::PowerOn);
        assert_eq!(cpu.peek(MCUSR), 0);
        assert_eq!(cpu.watchdog_timeout_ms(), None);
    }

    #[test]
    fn test_second_capture_returns_first() {
        let board = SimBoard::new();
        let cpu = board.boot();
        let latch = ResetLatch::new();

        let first = early_boot(&cpu, &latch);
        let second = early_boot(&cpu, &latch);

        assert_eq!(first, second);
        assert_eq!(second.kind(), ResetKind::PowerOn);
    }

    #[test]
    fn test_was_reset_reflects_snapshot() {
        let watchdog_boot = ResetSnapshot::from_raw(0x08);
        let external_boot = ResetSnapshot::from_raw(0x02);
        let board = SimBoard::new();
        let cpu = board.boot();

        assert!(Watchdog::new(&cpu, watchdog_boot).was_reset());
        assert!(!Watchdog::new(&cpu, external_boot).was_reset());
        assert_eq!(
            Watchdog::new(&cpu, external_boot).reset_cause().cause(),
            ResetCause::EXTERNAL
        );
    }
}
