//! Error types for watchdog operations.

use thiserror::Error;

/// Errors that can occur while configuring the watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WatchdogError {
    /// Raw prescaler bits outside the ten defined timeout bands.
    #[error("invalid watchdog timeout bits {0:#04x}")]
    InvalidTimeout(u8),

    /// The hardware did not accept the timed change sequence.
    ///
    /// The second write did not land within four cycles of the `WDCE`
    /// write, so `WDTCSR` kept its previous configuration.
    #[error("timed sequence rejected: expected WDTCSR {expected:#04x}, read back {actual:#04x}")]
    SequenceRejected {
        /// Configuration bits that were written.
        expected: u8,
        /// Configuration bits read back afterwards.
        actual: u8,
    },
}

impl WatchdogError {
    /// Create a sequence-rejected error.
    #[must_use]
    pub const fn sequence_rejected(expected: u8, actual: u8) -> Self {
        Self::SequenceRejected { expected, actual }
    }
}

/// A specialized `Result` type for watchdog operations.
pub type WatchdogResult<T> = core::result::Result<T, WatchdogError>;
