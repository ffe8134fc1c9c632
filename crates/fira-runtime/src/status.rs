//! Numeric status snapshot.

use fira_fault_inject::AttackMode;
use fira_watchdog::ResetKind;

/// Point-in-time view of the running system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Attack compiled into this build.
    pub mode: AttackMode,
    /// Why this boot happened.
    pub reset: ResetKind,
    /// Milliseconds since the session started.
    pub session_uptime_ms: u32,
    /// Current victim counter value.
    pub counter: u32,
    /// Fault interrupts this session.
    pub faults: u16,
    /// Heartbeats that detected corruption this session.
    pub corruptions: u32,
    /// Crashes across all boots.
    pub crashes: u16,
    /// Persisted uptime across all boots.
    pub total_uptime_ms: u32,
    /// Availability in percent.
    pub availability: u8,
}

impl StatusSnapshot {
    /// Session uptime in whole seconds.
    #[must_use]
    pub const fn session_uptime_secs(&self) -> u32 {
        self.session_uptime_ms / 1_000
    }
}
