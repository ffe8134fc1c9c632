//! Watchdog supervisor.

use fira_hal::atmega328p::{MCUSR, MCUSR_WDRF, WDTCSR, WDTCSR_WDCE, WDTCSR_WDE, WDTCSR_WDP_MASK};
use fira_hal::{Cpu, InterruptGuard, bit};

use crate::cause::{ResetLatch, ResetSnapshot};
use crate::error::{WatchdogError, WatchdogResult};
use crate::state::{WatchdogMetrics, WatchdogState, WatchdogStatus};
use crate::timeout::WatchdogTimeout;

const CONFIG_MASK: u8 = bit(WDTCSR_WDE) | WDTCSR_WDP_MASK;

/// Capture the reset cause and turn the watchdog off.
///
/// Must run before any other initialization. After a watchdog reset the
/// hardware keeps the watchdog enabled at the shortest period, so a slow
/// boot would otherwise reset again before reaching the main loop.
///
/// `MCUSR` is cleared before the timed sequence because `WDRF` forces `WDE`
/// on while it is set.
pub fn early_boot<C: Cpu + ?Sized>(cpu: &C, latch: &ResetLatch) -> ResetSnapshot {
    let snapshot = latch.capture(|| cpu.read(MCUSR));
    cpu.write(MCUSR, 0);
    {
        let _guard = InterruptGuard::new(cpu);
        cpu.write(WDTCSR, bit(WDTCSR_WDCE) | bit(WDTCSR_WDE));
        cpu.write(WDTCSR, 0);
    }
    tracing::info!(
        cause = snapshot.raw(),
        kind = snapshot.kind().as_str(),
        "reset cause captured"
    );
    snapshot
}

/// Owner of the watchdog peripheral for one boot.
#[derive(Debug)]
pub struct Watchdog<C: Cpu> {
    cpu: C,
    snapshot: ResetSnapshot,
    state: WatchdogState,
}

impl<C: Cpu> Watchdog<C> {
    /// Wrap the peripheral, remembering the cause captured by [`early_boot`].
    pub const fn new(cpu: C, snapshot: ResetSnapshot) -> Self {
        Self {
            cpu,
            snapshot,
            state: WatchdogState::new(),
        }
    }

    /// Arm the watchdog with `timeout`.
    ///
    /// Runs the timed change sequence with interrupts masked and reads the
    /// configuration back.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::SequenceRejected`] if the hardware kept its
    /// previous configuration.
    pub fn init(&self, timeout: WatchdogTimeout) -> WatchdogResult<()> {
        let expected = bit(WDTCSR_WDE) | timeout.prescaler_bits();
        let actual = {
            let _guard = InterruptGuard::new(&self.cpu);
            self.cpu.watchdog_reset();
            self.cpu.write(WDTCSR, bit(WDTCSR_WDCE) | bit(WDTCSR_WDE));
            self.cpu.write(WDTCSR, expected);
            self.cpu.read(WDTCSR) & CONFIG_MASK
        };

        if actual != expected {
            self.state.record_rejection();
            tracing::warn!(expected, actual, "watchdog arm sequence rejected");
            return Err(WatchdogError::sequence_rejected(expected, actual));
        }

        let previous = self.state.mark_armed(timeout);
        tracing::info!(
            timeout_ms = timeout.as_millis(),
            previous = previous.as_str(),
            "watchdog armed"
        );
        Ok(())
    }

    /// Restart the countdown.
    #[inline]
    pub fn kick(&self) {
        self.cpu.watchdog_reset();
        self.state.record_kick();
    }

    /// Turn the watchdog off.
    ///
    /// Clears `WDRF` first, since it holds `WDE` on.
    ///
    /// # Errors
    ///
    /// Returns [`WatchdogError::SequenceRejected`] if `WDE` is still set
    /// afterwards.
    pub fn disable(&self) -> WatchdogResult<()> {
        let actual = {
            let _guard = InterruptGuard::new(&self.cpu);
            self.cpu.watchdog_reset();
            self.cpu.clear_bit(MCUSR, MCUSR_WDRF);
            self.cpu.write(WDTCSR, bit(WDTCSR_WDCE) | bit(WDTCSR_WDE));
            self.cpu.write(WDTCSR, 0);
            self.cpu.read(WDTCSR) & CONFIG_MASK
        };

        if actual & bit(WDTCSR_WDE) != 0 {
            self.state.record_rejection();
            tracing::warn!(actual, "watchdog disable sequence rejected");
            return Err(WatchdogError::sequence_rejected(0, actual));
        }

        self.state.mark_disabled();
        tracing::info!("watchdog disabled");
        Ok(())
    }

    /// Arm the shortest timeout and stop responding.
    ///
    /// On hardware this never returns; the core resets within about 16 ms.
    pub fn force_reset(&self) {
        tracing::warn!("forcing watchdog reset");
        if let Err(error) = self.init(WatchdogTimeout::Ms16) {
            // WDE may already be on with a longer period; the reset still
            // happens, only later.
            tracing::warn!(%error, "could not shorten watchdog period");
        }
        self.cpu.halt();
    }

    /// Whether the current boot was caused by the watchdog.
    #[must_use]
    pub const fn was_reset(&self) -> bool {
        self.snapshot.was_watchdog()
    }

    /// Reset flags captured at boot.
    #[must_use]
    pub const fn reset_cause(&self) -> ResetSnapshot {
        self.snapshot
    }

    /// Current supervisor status.
    #[must_use]
    pub fn status(&self) -> WatchdogStatus {
        self.state.status()
    }

    /// Armed timeout, if armed.
    #[must_use]
    pub fn timeout(&self) -> Option<WatchdogTimeout> {
        match self.state.status() {
            WatchdogStatus::Armed(timeout) => Some(timeout),
            _ => None,
        }
    }

    /// Operation counters.
    #[must_use]
    pub fn metrics(&self) -> WatchdogMetrics {
        self.state.metrics()
    }

    /// The CPU handle the supervisor was built with.
    pub fn cpu(&self) -> &C {
        &self.cpu
    }
}
