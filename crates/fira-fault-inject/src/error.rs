//! Error types for fault timer configuration.

use thiserror::Error;

/// Errors reported while deriving the Timer1 configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaultConfigError {
    /// The core clock frequency was zero.
    #[error("core clock frequency must be non-zero")]
    ZeroClock,

    /// A zero-second interval would fire continuously.
    #[error("fault interval must be at least one second")]
    ZeroInterval,

    /// The compare value does not fit the 16-bit counter at any prescaler.
    #[error("fault interval of {seconds} s exceeds the {max_seconds} s the timer can count")]
    IntervalTooLong {
        /// Requested interval.
        seconds: u32,
        /// Longest interval the timer supports at this core clock.
        max_seconds: u32,
    },
}

/// A specialized `Result` type for fault injector configuration.
pub type FaultConfigResult<T> = core::result::Result<T, FaultConfigError>;
