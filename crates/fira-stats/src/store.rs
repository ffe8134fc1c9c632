//! Persistent crash and uptime statistics.

use core::cell::Cell;

use fira_systick::Monotonic;

use crate::availability::availability_percent;
use crate::eeprom::Eeprom;
use crate::layout::{CRASH_COUNT_ADDRESS, MAGIC, MAGIC_ADDRESS, TOTAL_UPTIME_ADDRESS};

/// How [`StatsStore::init`] found the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOrigin {
    /// The marker was valid and the counters were loaded.
    Restored,
    /// The marker was missing or corrupt; the record was zeroed.
    Reinitialized,
}

/// Crash counter and cumulative uptime kept in EEPROM.
///
/// Counters are cached in RAM after [`init`](Self::init). Writes go
/// through the update primitives so unchanged values cost no wear. The
/// store is foreground-only state.
#[derive(Debug)]
pub struct StatsStore<E: Eeprom, M: Monotonic> {
    eeprom: E,
    clock: M,
    recovery_cost_ms: u32,
    crash_count: Cell<u16>,
    total_uptime_ms: Cell<u32>,
    session_start_ms: Cell<u32>,
    flushed_at_ms: Cell<u32>,
}

impl<E: Eeprom, M: Monotonic> StatsStore<E, M> {
    /// Create a store. `recovery_cost_ms` is the downtime charged per crash.
    pub const fn new(eeprom: E, clock: M, recovery_cost_ms: u32) -> Self {
        Self {
            eeprom,
            clock,
            recovery_cost_ms,
            crash_count: Cell::new(0),
            total_uptime_ms: Cell::new(0),
            session_start_ms: Cell::new(0),
            flushed_at_ms: Cell::new(0),
        }
    }

    /// Load the record, zeroing it first if the marker is invalid.
    ///
    /// The marker is written last so a reset part-way through leaves an
    /// invalid record that is zeroed again on the next boot.
    pub fn init(&self) -> StatsOrigin {
        let marker = self.eeprom.read_word(MAGIC_ADDRESS);
        if marker == MAGIC {
            self.crash_count.set(self.eeprom.read_word(CRASH_COUNT_ADDRESS));
            self.total_uptime_ms
                .set(self.eeprom.read_dword(TOTAL_UPTIME_ADDRESS));
            tracing::debug!(
                crashes = self.crash_count.get(),
                total_uptime_ms = self.total_uptime_ms.get(),
                "statistics restored"
            );
            return StatsOrigin::Restored;
        }

        tracing::warn!(marker, "statistics marker invalid, reinitializing");
        self.eeprom.write_word(CRASH_COUNT_ADDRESS, 0);
        self.eeprom.write_dword(TOTAL_UPTIME_ADDRESS, 0);
        self.eeprom.write_word(MAGIC_ADDRESS, MAGIC);
        self.crash_count.set(0);
        self.total_uptime_ms.set(0);
        StatsOrigin::Reinitialized
    }

    /// Count one crash and persist it. Returns the new count.
    ///
    /// The counter wraps after 65535 crashes.
    pub fn record_crash(&self) -> u16 {
        let count = self.crash_count.get().wrapping_add(1);
        self.crash_count.set(count);
        self.eeprom.update_word(CRASH_COUNT_ADDRESS, count);
        tracing::info!(crashes = count, "crash recorded");
        count
    }

    /// Mark the start of the current session. Called once per boot.
    pub fn session_start(&self) {
        let now = self.clock.now_ms();
        self.session_start_ms.set(now);
        self.flushed_at_ms.set(now);
    }

    /// Milliseconds since the session origin.
    #[must_use]
    pub fn session_uptime(&self) -> u32 {
        self.clock.now_ms().wrapping_sub(self.session_start_ms.get())
    }

    /// Fold the uptime accrued since the last flush into the persisted
    /// total. Returns the new total.
    ///
    /// The session origin does not move. Flushing twice without time passing
    /// writes nothing the second time.
    pub fn flush_uptime(&self) -> u32 {
        let now = self.clock.now_ms();
        let delta = self.unflushed_uptime_at(now);
        let total = self.total_uptime_ms.get().wrapping_add(delta);
        self.total_uptime_ms.set(total);
        self.flushed_at_ms.set(now);
        let written = self.eeprom.update_dword(TOTAL_UPTIME_ADDRESS, total);
        tracing::debug!(delta_ms = delta, total_uptime_ms = total, written, "uptime flushed");
        total
    }

    fn unflushed_uptime_at(&self, now: u32) -> u32 {
        now.wrapping_sub(self.flushed_at_ms.get())
    }

    /// Session uptime not yet folded into the persisted total.
    #[must_use]
    pub fn unflushed_uptime(&self) -> u32 {
        self.unflushed_uptime_at(self.clock.now_ms())
    }

    /// Availability over stored plus unflushed uptime, in percent.
    #[must_use]
    pub fn availability(&self) -> u8 {
        let uptime =
            u64::from(self.total_uptime_ms.get()) + u64::from(self.unflushed_uptime());
        availability_percent(uptime, self.crash_count.get(), self.recovery_cost_ms)
    }

    /// Zero both counters in EEPROM. The marker stays valid.
    pub fn reset(&self) {
        self.eeprom.write_word(CRASH_COUNT_ADDRESS, 0);
        self.eeprom.write_dword(TOTAL_UPTIME_ADDRESS, 0);
        self.crash_count.set(0);
        self.total_uptime_ms.set(0);
        tracing::info!("statistics reset");
    }

    /// Crashes recorded since the record was created.
    #[must_use]
    pub fn crash_count(&self) -> u16 {
        self.crash_count.get()
    }

    /// Persisted uptime, excluding the unflushed part of this session.
    #[must_use]
    pub fn total_uptime(&self) -> u32 {
        self.total_uptime_ms.get()
    }

    /// Downtime charged per crash.
    #[must_use]
    pub const fn recovery_cost_ms(&self) -> u32 {
        self.recovery_cost_ms
    }

    /// The underlying storage.
    pub const fn eeprom(&self) -> &E {
        &self.eeprom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eeprom::RamEeprom;

    struct Fixed(Cell<u32>);

    impl Monotonic for Fixed {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    #[test]
    fn test_session_uptime_wraps() {
        let clock = Fixed(Cell::new(u32::MAX - 4));
        let stats = StatsStore::new(RamEeprom::new(), &clock, 2_000);
        stats.init();
        stats.session_start();
        clock.0.set(5);
        assert_eq!(stats.session_uptime(), 10);
        assert_eq!(stats.flush_uptime(), 10);
        assert_eq!(stats.session_uptime(), 10);
        assert_eq!(stats.unflushed_uptime(), 0);
    }
}
