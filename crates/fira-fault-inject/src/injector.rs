//! Fault injector driven by the Timer1 compare-match interrupt.

use core::cell::Cell;
use core::marker::PhantomData;

use fira_hal::atmega328p::{
    CS_MASK, OCR1AH, OCR1AL, TCCR1A, TCCR1B, TCCR1B_WGM12, TCNT1H, TCNT1L, TIFR1, TIFR1_OCF1A,
    TIMSK1, TIMSK1_OCIE1A,
};
use fira_hal::{Cpu, InterruptGuard, InterruptSink, Shared, Vector, bit, critical};

use crate::attack::{Attack, AttackMode, FaultOutcome};
use crate::config::FaultTimerConfig;
use crate::error::FaultConfigResult;
use crate::victim::VictimCell;

/// Periodic fault generator.
///
/// The count, flag, victim registration and last outcome are written by the
/// interrupt handler and read by the foreground, so all of them are held in
/// [`Shared`] cells.
pub struct FaultInjector<'v, C: Cpu, A: Attack> {
    cpu: C,
    config: Cell<Option<FaultTimerConfig>>,
    count: Shared<u16>,
    flag: Shared<bool>,
    victim: Shared<Option<&'v VictimCell>>,
    last_outcome: Shared<Option<FaultOutcome>>,
    _attack: PhantomData<A>,
}

impl<C: Cpu + core::fmt::Debug, A: Attack> core::fmt::Debug for FaultInjector<'_, C, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FaultInjector")
            .field("cpu", &self.cpu)
            .field("mode", &A::MODE)
            .field("config", &self.config.get())
            .finish_non_exhaustive()
    }
}

impl<'v, C: Cpu, A: Attack> FaultInjector<'v, C, A> {
    /// Create an unconfigured injector with no victim.
    pub const fn new(cpu: C) -> Self {
        Self {
            cpu,
            config: Cell::new(None),
            count: Shared::new(0),
            flag: Shared::new(false),
            victim: Shared::new(None),
            last_outcome: Shared::new(None),
            _attack: PhantomData,
        }
    }

    /// Compiled-in attack.
    #[must_use]
    pub const fn mode(&self) -> AttackMode {
        A::MODE
    }

    /// Configure Timer1 to interrupt every `interval_seconds` and start it.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is zero or too long for the 16-bit
    /// counter at this core clock. The timer is left untouched in that case.
    pub fn init(&self, interval_seconds: u32) -> FaultConfigResult<FaultTimerConfig> {
        let config = FaultTimerConfig::for_interval(self.cpu.core_clock_hz(), interval_seconds)?;

        {
            let _guard = InterruptGuard::new(&self.cpu);
            self.cpu.write(TCCR1B, 0);
            self.cpu.write(TCCR1A, 0);
            self.cpu.write_word(TCNT1L, TCNT1H, 0);
            self.cpu.write_word(OCR1AL, OCR1AH, config.compare());
            self.cpu.write(TIFR1, bit(TIFR1_OCF1A));
            self.cpu.set_bit(TIMSK1, TIMSK1_OCIE1A);
            self.cpu
                .write(TCCR1B, bit(TCCR1B_WGM12) | config.clock_select());
        }
        self.config.set(Some(config));

        tracing::info!(
            interval_s = interval_seconds,
            prescaler = config.prescaler(),
            compare = config.compare(),
            mode = A::MODE.as_str(),
            "fault timer configured"
        );
        Ok(config)
    }

    /// Active configuration, if `init` succeeded.
    #[must_use]
    pub fn config(&self) -> Option<FaultTimerConfig> {
        self.config.get()
    }

    /// Register (or with `None`, clear) the cell attacked by bit flips.
    pub fn set_victim(&self, victim: Option<&'v VictimCell>) {
        critical::free(&self.cpu, |cs| self.victim.set(cs, victim));
        tracing::info!(registered = victim.is_some(), "fault victim updated");
    }

    /// Currently registered victim.
    #[must_use]
    pub fn victim(&self) -> Option<&'v VictimCell> {
        critical::free(&self.cpu, |cs| self.victim.get(cs))
    }

    /// Restart the timer clock with the configured prescaler.
    ///
    /// Does nothing before a successful `init`.
    pub fn enable(&self) {
        if let Some(config) = self.config.get() {
            let _guard = InterruptGuard::new(&self.cpu);
            self.cpu.modify(TCCR1B, CS_MASK, config.clock_select());
        }
    }

    /// Stop the timer clock. Counter, compare value and interrupt mask are
    /// kept, so `enable` resumes where it stopped.
    pub fn disable(&self) {
        let _guard = InterruptGuard::new(&self.cpu);
        self.cpu.modify(TCCR1B, CS_MASK, 0);
    }

    /// Whether the timer clock is running.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.cpu.read(TCCR1B) & CS_MASK != 0
    }

    /// Interrupt handler body.
    ///
    /// Bumps the count, raises the flag, then runs the attack once.
    pub fn on_compare_match(&self) -> FaultOutcome {
        let (n, victim) = critical::free(&self.cpu, |cs| {
            let n = self.count.update(cs, |count| count.wrapping_add(1));
            self.flag.set(cs, true);
            (n, self.victim.get(cs))
        });
        let outcome = A::execute(&self.cpu, n, victim);
        critical::free(&self.cpu, |cs| self.last_outcome.set(cs, Some(outcome)));
        outcome
    }

    /// Number of fault interrupts since boot, wrapping at 65536.
    #[must_use]
    pub fn get_count(&self) -> u16 {
        critical::free(&self.cpu, |cs| self.count.get(cs))
    }

    /// Read and clear the one-shot fault flag.
    ///
    /// Each raised flag is observed by exactly one caller.
    pub fn check_and_clear_flag(&self) -> bool {
        critical::free(&self.cpu, |cs| self.flag.replace(cs, false))
    }

    /// Outcome of the most recent fault interrupt.
    #[must_use]
    pub fn last_outcome(&self) -> Option<FaultOutcome> {
        critical::free(&self.cpu, |cs| self.last_outcome.get(cs))
    }

    /// The CPU handle the injector was built with.
    pub fn cpu(&self) -> &C {
        &self.cpu
    }
}

impl<C: Cpu, A: Attack> InterruptSink for FaultInjector<'_, C, A> {
    fn on_interrupt(&self, vector: Vector) {
        if vector == Vector::Timer1CompA {
            self.on_compare_match();
        }
    }
}
