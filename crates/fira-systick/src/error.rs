//! Error types for clock configuration.

use thiserror::Error;

/// Errors reported while deriving the Timer0 configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    /// The core clock frequency was zero.
    #[error("core clock frequency must be non-zero")]
    ZeroClock,

    /// Even without prescaling one millisecond is less than one timer tick.
    #[error("core clock of {hz} Hz is too slow for a 1 ms tick")]
    TooSlow {
        /// Core clock in Hz.
        hz: u32,
    },

    /// No prescaler brings one millisecond within the 8-bit counter.
    #[error("core clock of {hz} Hz is too fast for a 1 ms tick on an 8-bit timer")]
    TooFast {
        /// Core clock in Hz.
        hz: u32,
    },
}

impl ClockError {
    /// Core clock frequency the error refers to, if any.
    #[must_use]
    pub const fn core_clock_hz(&self) -> Option<u32> {
        match self {
            Self::ZeroClock => None,
            Self::TooSlow { hz } | Self::TooFast { hz } => Some(*hz),
        }
    }
}

/// A specialized `Result` type for clock configuration.
pub type ClockResult<T> = core::result::Result<T, ClockError>;
