//! Timer1 configuration for a whole-second compare-match period.

use fira_hal::atmega328p::{TIMER_PRESCALERS, cs_for_prescaler};

use crate::error::{FaultConfigError, FaultConfigResult};

/// Timer1 settings producing one compare-match interrupt per interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultTimerConfig {
    interval_seconds: u32,
    prescaler: u16,
    compare: u16,
}

impl FaultTimerConfig {
    /// Pick the smallest prescaler for which
    /// `(core_clock_hz / prescaler) * interval_seconds - 1` fits 16 bits.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero clock, a zero interval, or an interval no
    /// prescaler can reach.
    pub const fn for_interval(core_clock_hz: u32, interval_seconds: u32) -> FaultConfigResult<Self> {
        if core_clock_hz == 0 {
            return Err(FaultConfigError::ZeroClock);
        }
        if interval_seconds == 0 {
            return Err(FaultConfigError::ZeroInterval);
        }
        let mut index = 0;
        while index < TIMER_PRESCALERS.len() {
            let prescaler = TIMER_PRESCALERS[index];
            let counts = (core_clock_hz / prescaler as u32) as u64 * interval_seconds as u64;
            if counts >= 1 && counts <= 65_536 {
                return Ok(Self {
                    interval_seconds,
                    prescaler,
                    compare: (counts - 1) as u16,
                });
            }
            index += 1;
        }
        Err(FaultConfigError::IntervalTooLong {
            seconds: interval_seconds,
            max_seconds: max_interval_seconds(core_clock_hz),
        })
    }

    /// Requested interval.
    #[must_use]
    pub const fn interval_seconds(self) -> u32 {
        self.interval_seconds
    }

    /// Selected prescaler.
    #[must_use]
    pub const fn prescaler(self) -> u16 {
        self.prescaler
    }

    /// Value written to `OCR1A`.
    #[must_use]
    pub const fn compare(self) -> u16 {
        self.compare
    }

    /// Clock-select field for `TCCR1B`.
    #[must_use]
    pub const fn clock_select(self) -> u8 {
        match cs_for_prescaler(self.prescaler) {
            Some(cs) => cs,
            None => 0,
        }
    }
}

/// Longest whole-second interval Timer1 can count at `core_clock_hz`.
#[must_use]
pub const fn max_interval_seconds(core_clock_hz: u32) -> u32 {
    let slowest = core_clock_hz / 1_024;
    if slowest == 0 {
        return u32::MAX;
    }
    65_536 / slowest
}
