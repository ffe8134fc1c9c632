//! Error types for bringing up the runtime.

use fira_fault_inject::FaultConfigError;
use fira_systick::ClockError;
use fira_watchdog::WatchdogError;
use thiserror::Error;

/// Errors that can occur while booting the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A timing parameter is out of range.
    #[error("invalid runtime configuration: {0}")]
    InvalidConfig(&'static str),

    /// The millisecond clock cannot be configured.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// The fault timer cannot be configured.
    #[error(transparent)]
    Fault(#[from] FaultConfigError),

    /// The watchdog rejected its configuration.
    #[error(transparent)]
    Watchdog(#[from] WatchdogError),
}

impl RuntimeError {
    /// Create an invalid configuration error.
    #[must_use]
    pub const fn invalid_config(reason: &'static str) -> Self {
        Self::InvalidConfig(reason)
    }
}

/// A specialized `Result` type for runtime operations.
pub type RuntimeResult<T> = core::result::Result<T, RuntimeError>;
