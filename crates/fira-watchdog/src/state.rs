//! Supervisor state and metrics.
//!
//! The supervisor state is mirrored in an atomic cell so that it can be
//! inspected from any context without a critical section.

use portable_atomic::{AtomicU8, AtomicU32, Ordering};

use crate::timeout::WatchdogTimeout;

const RAW_UNINITIALIZED: u8 = 0;
const RAW_DISABLED: u8 = 1;
const RAW_ARMED: u8 = 0x10;

/// Supervisor status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchdogStatus {
    /// Nothing has touched the watchdog yet this boot.
    #[default]
    Uninitialized,
    /// The watchdog is off.
    Disabled,
    /// The watchdog will reset the core unless kicked within the timeout.
    Armed(WatchdogTimeout),
}

impl WatchdogStatus {
    /// Convert from the packed representation.
    #[must_use]
    pub const fn from_raw(value: u8) -> Option<Self> {
        match value {
            RAW_UNINITIALIZED => Some(Self::Uninitialized),
            RAW_DISABLED => Some(Self::Disabled),
            _ if value & RAW_ARMED != 0 => match WatchdogTimeout::from_bits(value & 0x0F) {
                Some(timeout) => Some(Self::Armed(timeout)),
                None => None,
            },
            _ => None,
        }
    }

    /// Convert to the packed representation.
    #[must_use]
    pub const fn to_raw(self) -> u8 {
        match self {
            Self::Uninitialized => RAW_UNINITIALIZED,
            Self::Disabled => RAW_DISABLED,
            Self::Armed(timeout) => RAW_ARMED | timeout.bits(),
        }
    }

    /// Whether the watchdog is running.
    #[must_use]
    pub const fn is_armed(self) -> bool {
        matches!(self, Self::Armed(_))
    }

    /// Get the status name as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "Uninitialized",
            Self::Disabled => "Disabled",
            Self::Armed(_) => "Armed",
        }
    }
}

impl core::fmt::Display for WatchdogStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Armed(timeout) => write!(f, "Armed ({timeout})"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Atomic supervisor state plus operation counters.
#[derive(Debug, Default)]
pub struct WatchdogState {
    status: AtomicU8,
    arm_count: AtomicU32,
    kick_count: AtomicU32,
    disable_count: AtomicU32,
    rejected_count: AtomicU32,
}

impl WatchdogState {
    /// Create a state in `Uninitialized` with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: AtomicU8::new(RAW_UNINITIALIZED),
            arm_count: AtomicU32::new(0),
            kick_count: AtomicU32::new(0),
            disable_count: AtomicU32::new(0),
            rejected_count: AtomicU32::new(0),
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> WatchdogStatus {
        let raw = self.status.load(Ordering::Acquire);
        WatchdogStatus::from_raw(raw).unwrap_or(WatchdogStatus::Uninitialized)
    }

    /// Record a successful arm; returns the previous status.
    pub fn mark_armed(&self, timeout: WatchdogTimeout) -> WatchdogStatus {
        let previous = self
            .status
            .swap(WatchdogStatus::Armed(timeout).to_raw(), Ordering::AcqRel);
        self.arm_count.fetch_add(1, Ordering::Relaxed);
        WatchdogStatus::from_raw(previous).unwrap_or(WatchdogStatus::Uninitialized)
    }

    /// Record a successful disable; returns the previous status.
    pub fn mark_disabled(&self) -> WatchdogStatus {
        let previous = self
            .status
            .swap(WatchdogStatus::Disabled.to_raw(), Ordering::AcqRel);
        self.disable_count.fetch_add(1, Ordering::Relaxed);
        WatchdogStatus::from_raw(previous).unwrap_or(WatchdogStatus::Uninitialized)
    }

    /// Record a kick.
    pub fn record_kick(&self) {
        self.kick_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected timed sequence.
    pub fn record_rejection(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn metrics(&self) -> WatchdogMetrics {
        WatchdogMetrics {
            arm_count: self.arm_count.load(Ordering::Relaxed),
            kick_count: self.kick_count.load(Ordering::Relaxed),
            disable_count: self.disable_count.load(Ordering::Relaxed),
            rejected_count: self.rejected_count.load(Ordering::Relaxed),
        }
    }
}

/// Counters for diagnostics. All wrap on overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WatchdogMetrics {
    /// Successful `init` calls.
    pub arm_count: u32,
    /// `kick` calls.
    pub kick_count: u32,
    /// Successful `disable` calls.
    pub disable_count: u32,
    /// Timed sequences the hardware did not accept.
    pub rejected_count: u32,
}
