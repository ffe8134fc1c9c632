//! Boot sequence and main-loop step.

use fira_fault_inject::{Attack, AttackMode, VictimCell};
use fira_hal::Cpu;
use fira_stats::{AvrEeprom, StatsOrigin, StatsStore};
use fira_systick::{SysTick, interval_elapsed};
use fira_watchdog::{ResetLatch, ResetSnapshot, Watchdog, early_boot};

use crate::config::{ActiveAttack, RuntimeConfig};
use crate::error::RuntimeResult;
use crate::heartbeat::{Beat, HeartbeatMonitor};
use crate::status::StatusSnapshot;
use crate::vectors::Vectors;

/// The running firmware for one boot.
///
/// Owns the watchdog and the statistics store and borrows the vector table,
/// which the interrupt handlers share. The main loop calls
/// [`poll`](Self::poll) forever.
#[derive(Debug)]
pub struct Runtime<'a, 'v, C: Cpu, A: Attack = ActiveAttack> {
    cpu: C,
    vectors: &'a Vectors<'v, C, A>,
    victim: &'v VictimCell,
    watchdog: Watchdog<C>,
    stats: StatsStore<AvrEeprom<C>, &'a SysTick<C>>,
    stats_origin: StatsOrigin,
    config: RuntimeConfig,
    monitor: HeartbeatMonitor,
    heartbeat_tick: u32,
    summary_tick: u32,
    flush_tick: u32,
    last_summary: Option<StatusSnapshot>,
}

impl<'a, 'v, C: Cpu + Copy, A: Attack> Runtime<'a, 'v, C, A> {
    /// Bring the system up.
    ///
    /// Order matters: the reset cause is latched and the watchdog disarmed
    /// before anything else, a crash is recorded only for a watchdog reset,
    /// and interrupts are enabled only once every handler's state is set up.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error. Bring-up stops there, with
    /// interrupts still masked.
    pub fn boot(
        cpu: C,
        vectors: &'a Vectors<'v, C, A>,
        victim: &'v VictimCell,
        latch: &ResetLatch,
        config: RuntimeConfig,
    ) -> RuntimeResult<Self> {
        let snapshot = early_boot(&cpu, latch);
        let config = config.check(cpu.core_clock_hz())?;

        let watchdog = Watchdog::new(cpu, snapshot);
        let stats = StatsStore::new(AvrEeprom::new(cpu), vectors.clock(), config.recovery_cost_ms());
        let stats_origin = stats.init();
        if watchdog.was_reset() {
            stats.record_crash();
        }

        vectors.clock().init()?;
        vectors.injector().init(config.fault_interval_seconds)?;
        vectors.injector().set_victim(Some(victim));
        watchdog.init(config.watchdog_timeout)?;

        cpu.enable_interrupts();
        stats.session_start();
        let now = vectors.clock().get_ms();

        tracing::info!(
            mode = A::MODE.as_str(),
            reset = snapshot.kind().as_str(),
            crashes = stats.crash_count(),
            "runtime started"
        );

        Ok(Self {
            cpu,
            vectors,
            victim,
            watchdog,
            stats,
            stats_origin,
            config,
            monitor: HeartbeatMonitor::new(victim.get(&cpu)),
            heartbeat_tick: now,
            summary_tick: now,
            flush_tick: now,
            last_summary: None,
        })
    }
}

impl<'a, 'v, C: Cpu, A: Attack> Runtime<'a, 'v, C, A> {
    /// One main-loop iteration: heartbeat, periodic bookkeeping, then an
    /// unconditional watchdog kick.
    ///
    /// Returns the heartbeat result if a heartbeat was due.
    pub fn poll(&mut self) -> Option<Beat> {
        let now = self.vectors.clock().get_ms();

        let beat = interval_elapsed(now, &mut self.heartbeat_tick, self.config.heartbeat_interval_ms)
            .then(|| self.heartbeat());

        if interval_elapsed(now, &mut self.flush_tick, self.config.uptime_flush_interval_ms) {
            self.stats.flush_uptime();
        }

        if interval_elapsed(now, &mut self.summary_tick, self.config.summary_interval_ms) {
            let status = self.status();
            tracing::info!(
                session_s = status.session_uptime_secs(),
                counter = status.counter,
                faults = status.faults,
                crashes = status.crashes,
                availability = status.availability,
                "status"
            );
            self.last_summary = Some(status);
        }

        self.watchdog.kick();
        beat
    }

    fn heartbeat(&mut self) -> Beat {
        let counter = self.victim.increment(&self.cpu);
        let fault_injected = self.vectors.injector().check_and_clear_flag();
        self.monitor.observe(counter, fault_injected)
    }

    /// Current numeric status.
    #[must_use]
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot {
            mode: A::MODE,
            reset: self.watchdog.reset_cause().kind(),
            session_uptime_ms: self.stats.session_uptime(),
            counter: self.victim.get(&self.cpu),
            faults: self.vectors.injector().get_count(),
            corruptions: self.monitor.corruptions(),
            crashes: self.stats.crash_count(),
            total_uptime_ms: self.stats.total_uptime(),
            availability: self.stats.availability(),
        }
    }

    /// The snapshot taken at the most recent summary interval.
    #[must_use]
    pub const fn last_summary(&self) -> Option<StatusSnapshot> {
        self.last_summary
    }

    /// Attack compiled into this runtime.
    #[must_use]
    pub const fn mode(&self) -> AttackMode {
        A::MODE
    }

    /// Reset cause latched at boot.
    #[must_use]
    pub const fn reset_cause(&self) -> ResetSnapshot {
        self.watchdog.reset_cause()
    }

    /// How the statistics record was found at boot.
    #[must_use]
    pub const fn stats_origin(&self) -> StatsOrigin {
        self.stats_origin
    }

    /// The watchdog supervisor.
    pub const fn watchdog(&self) -> &Watchdog<C> {
        &self.watchdog
    }

    /// The statistics store.
    pub const fn stats(&self) -> &StatsStore<AvrEeprom<C>, &'a SysTick<C>> {
        &self.stats
    }

    /// The heartbeat monitor.
    pub const fn monitor(&self) -> &HeartbeatMonitor {
        &self.monitor
    }

    /// The vector table.
    pub const fn vectors(&self) -> &'a Vectors<'v, C, A> {
        self.vectors
    }

    /// Configuration this runtime booted with.
    #[must_use]
    pub const fn config(&self) -> RuntimeConfig {
        self.config
    }
}
