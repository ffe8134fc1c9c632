//! Build-time configuration.
//!
//! Timing constants are fixed at build time and checked by `const`
//! assertions, so an unusable combination fails the build instead of the
//! boot. The attack compiled into the fault handler is chosen with exactly
//! one `attack-*` cargo feature.

use fira_fault_inject::{AttackMode, FaultTimerConfig};
use fira_systick::TickConfig;
use fira_watchdog::WatchdogTimeout;

use crate::error::{RuntimeError, RuntimeResult};

/// Core clock of the target board.
pub const CORE_CLOCK_HZ: u32 = 16_000_000;
/// Period of the heartbeat that advances and checks the victim counter.
pub const HEARTBEAT_INTERVAL_MS: u32 = 100;
/// Period of the fault timer.
pub const FAULT_INTERVAL_SECONDS: u32 = 3;
/// Watchdog period. Also the downtime charged per crash.
pub const WATCHDOG_TIMEOUT: WatchdogTimeout = WatchdogTimeout::S2;
/// Period of the status snapshot.
pub const SUMMARY_INTERVAL_MS: u32 = 10_000;
/// Period at which session uptime is folded into EEPROM.
pub const UPTIME_FLUSH_INTERVAL_MS: u32 = 60_000;

/// The attack type selected by the enabled `attack-*` feature.
#[cfg(feature = "attack-bitflip")]
pub type ActiveAttack = fira_fault_inject::BitFlip;
/// The attack type selected by the enabled `attack-*` feature.
#[cfg(all(feature = "attack-redirect", not(feature = "attack-bitflip")))]
pub type ActiveAttack = fira_fault_inject::ControlRedirect;
/// The attack type selected by the enabled `attack-*` feature.
#[cfg(all(
    feature = "attack-hang",
    not(any(feature = "attack-bitflip", feature = "attack-redirect"))
))]
pub type ActiveAttack = fira_fault_inject::Hang;
/// The attack type selected by the enabled `attack-*` feature.
#[cfg(not(any(
    feature = "attack-bitflip",
    feature = "attack-redirect",
    feature = "attack-hang"
)))]
pub type ActiveAttack = fira_fault_inject::Safe;

const fn selected(enabled: bool) -> usize {
    if enabled { 1 } else { 0 }
}

const SELECTED_ATTACKS: usize = selected(cfg!(feature = "attack-bitflip"))
    + selected(cfg!(feature = "attack-redirect"))
    + selected(cfg!(feature = "attack-hang"))
    + selected(cfg!(feature = "attack-safe"));

#[cfg(not(any(
    feature = "attack-bitflip",
    feature = "attack-redirect",
    feature = "attack-hang",
    feature = "attack-safe"
)))]
compile_error!("enable one of `attack-bitflip`, `attack-redirect`, `attack-hang`, `attack-safe`");

const _: () = assert!(
    SELECTED_ATTACKS <= 1,
    "features `attack-bitflip`, `attack-redirect`, `attack-hang` and `attack-safe` are mutually exclusive"
);

/// Mode of [`ActiveAttack`].
pub const ACTIVE_ATTACK: AttackMode = <ActiveAttack as fira_fault_inject::Attack>::MODE;

/// Timing parameters handed to [`Runtime::boot`](crate::Runtime::boot).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Heartbeat period in milliseconds.
    pub heartbeat_interval_ms: u32,
    /// Fault timer period in seconds.
    pub fault_interval_seconds: u32,
    /// Watchdog period.
    pub watchdog_timeout: WatchdogTimeout,
    /// Status snapshot period in milliseconds.
    pub summary_interval_ms: u32,
    /// Uptime flush period in milliseconds.
    pub uptime_flush_interval_ms: u32,
}

impl RuntimeConfig {
    /// The build-time constants.
    pub const DEFAULT: Self = Self {
        heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
        fault_interval_seconds: FAULT_INTERVAL_SECONDS,
        watchdog_timeout: WATCHDOG_TIMEOUT,
        summary_interval_ms: SUMMARY_INTERVAL_MS,
        uptime_flush_interval_ms: UPTIME_FLUSH_INTERVAL_MS,
    };

    /// Downtime charged per crash: one watchdog period.
    #[must_use]
    pub const fn recovery_cost_ms(self) -> u32 {
        self.watchdog_timeout.as_millis()
    }

    /// Check every parameter against a core clock.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::InvalidConfig`] for a zero period, or the
    /// clock or fault timer error for a period the timers cannot produce.
    pub const fn check(self, core_clock_hz: u32) -> RuntimeResult<Self> {
        if self.heartbeat_interval_ms == 0 {
            return Err(RuntimeError::invalid_config("heartbeat interval is zero"));
        }
        if self.summary_interval_ms == 0 {
            return Err(RuntimeError::invalid_config("summary interval is zero"));
        }
        if self.uptime_flush_interval_ms == 0 {
            return Err(RuntimeError::invalid_config("uptime flush interval is zero"));
        }
        if let Err(err) = TickConfig::for_core_clock(core_clock_hz) {
            return Err(RuntimeError::Clock(err));
        }
        if let Err(err) = FaultTimerConfig::for_interval(core_clock_hz, self.fault_interval_seconds)
        {
            return Err(RuntimeError::Fault(err));
        }
        Ok(self)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const _: () = assert!(
    RuntimeConfig::DEFAULT.check(CORE_CLOCK_HZ).is_ok(),
    "build-time timing constants are not achievable at CORE_CLOCK_HZ"
);

#[cfg(test)]
mod tests {
    use super::*;
    use fira_fault_inject::FaultConfigError;

    #[test]
    fn test_default_matches_constants() {
        let config = RuntimeConfig::default();
        assert_eq!(config.heartbeat_interval_ms, 100);
        assert_eq!(config.fault_interval_seconds, 3);
        assert_eq!(config.watchdog_timeout, WatchdogTimeout::S2);
        assert_eq!(config.recovery_cost_ms(), 2_000);
    }

    #[test]
    fn test_check_rejects_unreachable_fault_interval() {
        let config = RuntimeConfig {
            fault_interval_seconds: 5,
            ..RuntimeConfig::DEFAULT
        };
        assert_eq!(
            config.check(CORE_CLOCK_HZ),
            Err(RuntimeError::Fault(FaultConfigError::IntervalTooLong {
                seconds: 5,
                max_seconds: 4
            }))
        );
    }

    #[test]
    fn test_check_rejects_zero_periods() {
        let config = RuntimeConfig {
            heartbeat_interval_ms: 0,
            ..RuntimeConfig::DEFAULT
        };
        assert!(matches!(
            config.check(CORE_CLOCK_HZ),
            Err(RuntimeError::InvalidConfig(_))
        ));
    }

    #[cfg(all(feature = "attack-bitflip", not(feature = "attack-safe")))]
    #[test]
    fn test_default_build_flips_bits() {
        assert_eq!(ACTIVE_ATTACK, AttackMode::BitFlip);
    }
}
