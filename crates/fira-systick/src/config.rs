//! Timer0 configuration for a 1 ms compare-match period.

use fira_hal::atmega328p::{TIMER_PRESCALERS, cs_for_prescaler};

use crate::error::{ClockError, ClockResult};

/// Timer0 settings producing one compare-match interrupt per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickConfig {
    prescaler: u16,
    compare: u8,
}

impl TickConfig {
    /// Pick the smallest prescaler whose rounded per-millisecond count fits
    /// the 8-bit counter.
    ///
    /// # Errors
    ///
    /// Returns an error if no prescaler gives a count in `1..=256`.
    pub const fn for_core_clock(core_clock_hz: u32) -> ClockResult<Self> {
        if core_clock_hz == 0 {
            return Err(ClockError::ZeroClock);
        }
        let hz = core_clock_hz as u64;
        let mut index = 0;
        while index < TIMER_PRESCALERS.len() {
            let prescaler = TIMER_PRESCALERS[index];
            let divisor = prescaler as u64 * 1_000;
            let counts = (hz + divisor / 2) / divisor;
            if counts == 0 {
                return Err(ClockError::TooSlow { hz: core_clock_hz });
            }
            if counts <= 256 {
                return Ok(Self {
                    prescaler,
                    compare: (counts - 1) as u8,
                });
            }
            index += 1;
        }
        Err(ClockError::TooFast { hz: core_clock_hz })
    }

    /// Selected prescaler.
    #[must_use]
    pub const fn prescaler(self) -> u16 {
        self.prescaler
    }

    /// Value written to `OCR0A`.
    #[must_use]
    pub const fn compare(self) -> u8 {
        self.compare
    }

    /// Clock-select field for `TCCR0B`.
    #[must_use]
    pub const fn clock_select(self) -> u8 {
        match cs_for_prescaler(self.prescaler) {
            Some(cs) => cs,
            None => 0,
        }
    }

    /// Core clock cycles per tick.
    #[must_use]
    pub const fn cycles_per_tick(self) -> u32 {
        self.prescaler as u32 * (self.compare as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), ClockError>;

    #[test]
    fn test_reference_board() -> TestResult {
        let config = TickConfig::for_core_clock(16_000_000)?;
        assert_eq!(config.prescaler(), 64);
        assert_eq!(config.compare(), 249);
        assert_eq!(config.clock_select(), 3);
        assert_eq!(config.cycles_per_tick(), 16_000);
        Ok(())
    }

    #[test]
    fn test_slow_clock_uses_smaller_prescaler() -> TestResult {
        let config = TickConfig::for_core_clock(1_000_000)?;
        assert_eq!(config.prescaler(), 8);
        assert_eq!(config.compare(), 124);
        Ok(())
    }

    #[test]
    fn test_unrepresentable_clocks() {
        assert_eq!(TickConfig::for_core_clock(0), Err(ClockError::ZeroClock));
        assert_eq!(
            TickConfig::for_core_clock(400),
            Err(ClockError::TooSlow { hz: 400 })
        );
        assert_eq!(
            TickConfig::for_core_clock(300_000_000),
            Err(ClockError::TooFast { hz: 300_000_000 })
        );
    }
}
