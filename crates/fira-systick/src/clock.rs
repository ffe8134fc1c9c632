//! Millisecond clock driven by the Timer0 compare-match interrupt.

use fira_hal::atmega328p::{
    CS_MASK, OCR0A, TCCR0A, TCCR0A_WGM01, TCCR0B, TCNT0, TIFR0, TIFR0_OCF0A, TIMSK0,
    TIMSK0_OCIE0A,
};
use fira_hal::{Cpu, InterruptSink, Shared, Vector, bit, critical};

use crate::config::TickConfig;
use crate::error::ClockResult;

/// Source of monotonic milliseconds.
pub trait Monotonic {
    /// Milliseconds since the clock started, wrapping at `u32::MAX`.
    fn now_ms(&self) -> u32;
}

impl<M: Monotonic + ?Sized> Monotonic for &M {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Whether `interval` milliseconds have passed since `*last`.
///
/// On `true`, `*last` is moved to `now`. The subtraction wraps, so the
/// result stays correct when the tick counter rolls over.
#[must_use]
pub fn interval_elapsed(now: u32, last: &mut u32, interval: u32) -> bool {
    if now.wrapping_sub(*last) >= interval {
        *last = now;
        true
    } else {
        false
    }
}

/// The system tick.
///
/// The counter is written only by [`on_compare_match`](Self::on_compare_match)
/// and read under a critical section, so a read never observes a half-updated
/// 32-bit value.
#[derive(Debug)]
pub struct SysTick<C: Cpu> {
    cpu: C,
    ticks: Shared<u32>,
}

impl<C: Cpu> SysTick<C> {
    /// Create a stopped clock at zero.
    pub const fn new(cpu: C) -> Self {
        Self {
            cpu,
            ticks: Shared::new(0),
        }
    }

    /// Configure Timer0 for a 1 ms compare-match interrupt.
    ///
    /// Global interrupts are left as they are; ticks start once the caller
    /// enables them.
    ///
    /// # Errors
    ///
    /// Returns an error if the core clock cannot produce a 1 ms period.
    pub fn init(&self) -> ClockResult<TickConfig> {
        let config = TickConfig::for_core_clock(self.cpu.core_clock_hz())?;

        self.cpu.write(TCCR0B, 0);
        self.cpu.write(TCCR0A, bit(TCCR0A_WGM01));
        self.cpu.write(OCR0A, config.compare());
        self.cpu.write(TCNT0, 0);
        self.cpu.write(TIFR0, bit(TIFR0_OCF0A));
        self.cpu.set_bit(TIMSK0, TIMSK0_OCIE0A);
        self.cpu
            .modify(TCCR0B, CS_MASK, config.clock_select());

        tracing::debug!(
            core_clock_hz = self.cpu.core_clock_hz(),
            prescaler = config.prescaler(),
            compare = config.compare(),
            "millisecond tick configured"
        );
        Ok(config)
    }

    /// Interrupt handler body: advance the counter by one.
    #[inline]
    pub fn on_compare_match(&self) {
        critical::free(&self.cpu, |cs| {
            self.ticks.update(cs, |ticks| ticks.wrapping_add(1));
        });
    }

    /// Milliseconds since `init`, wrapping after about 49.7 days.
    #[must_use]
    pub fn get_ms(&self) -> u32 {
        critical::free(&self.cpu, |cs| self.ticks.get(cs))
    }

    /// Overwrite the counter.
    ///
    /// Used to start a simulated run close to the wrap point.
    pub fn set_ms(&self, ms: u32) {
        critical::free(&self.cpu, |cs| self.ticks.set(cs, ms));
    }

    /// Whether `interval` ms have passed since `*last`; see
    /// [`interval_elapsed`].
    pub fn elapsed(&self, last: &mut u32, interval: u32) -> bool {
        interval_elapsed(self.get_ms(), last, interval)
    }

    /// Busy-wait for at least `ms` milliseconds.
    ///
    /// Requires interrupts to be enabled; with them masked the counter never
    /// advances and this never returns.
    pub fn delay(&self, ms: u32) {
        let start = self.get_ms();
        while self.get_ms().wrapping_sub(start) < ms {
            self.cpu.spin();
        }
    }

    /// The CPU handle the clock was built with.
    pub fn cpu(&self) -> &C {
        &self.cpu
    }
}

impl<C: Cpu> Monotonic for SysTick<C> {
    fn now_ms(&self) -> u32 {
        self.get_ms()
    }
}

impl<C: Cpu> InterruptSink for SysTick<C> {
    fn on_interrupt(&self, vector: Vector) {
        if vector == Vector::Timer0CompA {
            self.on_compare_match();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_elapsed_moves_origin() {
        let mut last = 0;
        assert!(!interval_elapsed(99, &mut last, 100));
        assert_eq!(last, 0);
        assert!(interval_elapsed(100, &mut last, 100));
        assert_eq!(last, 100);
        assert!(!interval_elapsed(150, &mut last, 100));
    }

    #[test]
    fn test_interval_elapsed_across_wrap() {
        let mut last = u32::MAX - 2;
        assert!(interval_elapsed(2, &mut last, 5));
        assert_eq!(last, 2);
    }

    #[test]
    fn test_zero_interval_always_fires() {
        let mut last = 7;
        assert!(interval_elapsed(7, &mut last, 0));
    }
}
