//! Host-side simulated ATmega328P board.
//!
//! [`SimBoard`] holds everything that survives a reset: EEPROM contents, the
//! reset-cause register, the watchdog, and the global cycle counter. Each boot
//! produces a fresh [`SimCpu`] session that borrows the board; RAM state
//! (every component built on top of the session) is discarded by dropping it
//! and booting again.
//!
//! Time is counted in CPU cycles. Every bus access costs one cycle and
//! interrupts are dispatched at access boundaries when `SREG.I` is set, so
//! a foreground read-modify-write that is not guarded really can be
//! interleaved with an interrupt handler. The watchdog keeps counting while
//! the core is halted.

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use crate::atmega328p::{
    CS_MASK, EEARH, EEARL, EECR, EECR_EEMPE, EECR_EEPE, EECR_EERE, EEDR, EEPROM_SIZE, MCUSR,
    MCUSR_BORF, MCUSR_EXTRF, MCUSR_PORF, MCUSR_WDRF, OCR0A, OCR1AH, OCR1AL, SREG, SREG_I,
    TCCR0A, TCCR0A_WGM01, TCCR0B, TCCR1B, TCCR1B_WGM12, TCNT0, TCNT1H, TCNT1L, TIFR0,
    TIFR0_OCF0A, TIFR1, TIFR1_OCF1A, TIMED_SEQUENCE_CYCLES, TIMSK0, TIMSK0_OCIE0A, TIMSK1,
    TIMSK1_OCIE1A, WDTCSR, WDTCSR_WDCE, WDTCSR_WDE, WDTCSR_WDIE, WDTCSR_WDP_MASK,
    prescaler_for_cs,
};
use crate::cpu::{Cpu, InterruptSink, Vector};
use crate::register::{Register, bit};

/// Core clock of the reference board.
pub const DEFAULT_CORE_CLOCK_HZ: u32 = 16_000_000;

/// Cycles consumed by one [`Cpu::spin`] call unless configured otherwise.
pub const DEFAULT_SPIN_CYCLES: u64 = 160;

const ISR_ENTRY_CYCLES: u64 = 4;
const ISR_EXIT_CYCLES: u64 = 4;
const EEPROM_READ_STALL_CYCLES: u64 = 4;
const EEPROM_WRITE_STALL_CYCLES: u64 = 2;
const EEPROM_PROGRAM_US: u64 = 3_400;

/// Nominal watchdog periods for prescaler values 0..=9.
const WATCHDOG_NOMINAL_MS: [u64; 10] = [16, 32, 64, 125, 250, 500, 1_000, 2_000, 4_000, 8_000];

/// What caused a simulated reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetSource {
    /// Supply ramped up.
    PowerOn,
    /// Reset pin pulled low.
    External,
    /// Supply dipped below the brown-out threshold.
    BrownOut,
    /// Watchdog expired while enabled.
    Watchdog,
    /// Firmware jumped to the reset vector; no hardware flag is set.
    SoftwareJump,
}

impl ResetSource {
    fn mcusr_flag(self) -> Option<u8> {
        match self {
            Self::PowerOn => Some(MCUSR_PORF),
            Self::External => Some(MCUSR_EXTRF),
            Self::BrownOut => Some(MCUSR_BORF),
            Self::Watchdog => Some(MCUSR_WDRF),
            Self::SoftwareJump => None,
        }
    }
}

/// A reset observed by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetEvent {
    /// Cause of the reset.
    pub source: ResetSource,
    /// Board cycle at which the reset happened.
    pub at_cycle: u64,
    /// Board cycle of the last watchdog restart (`wdr` or enable) before it.
    pub last_kick_cycle: u64,
    /// Boot number of the session that was terminated.
    pub boot: u32,
}

#[derive(Debug)]
struct BoardState {
    regs: [u8; 256],
    eeprom: [u8; EEPROM_SIZE],
    eeprom_writes: [u32; EEPROM_SIZE],
    cycle: u64,
    boot_cycle: u64,
    generation: u32,
    timer0_phase: u64,
    timer1_phase: u64,
    watchdog_cycles: u64,
    last_kick_cycle: u64,
    wdce_deadline: Option<u64>,
    eempe_deadline: Option<u64>,
    eeprom_busy_until: u64,
    halted: bool,
    in_isr: bool,
    serviced: [u64; 2],
    pending_reset: Option<ResetEvent>,
    history: Vec<ResetEvent>,
}

impl BoardState {
    fn new() -> Self {
        Self {
            regs: [0; 256],
            eeprom: [0xFF; EEPROM_SIZE],
            eeprom_writes: [0; EEPROM_SIZE],
            cycle: 0,
            boot_cycle: 0,
            generation: 0,
            timer0_phase: 0,
            timer1_phase: 0,
            watchdog_cycles: 0,
            last_kick_cycle: 0,
            wdce_deadline: None,
            eempe_deadline: None,
            eeprom_busy_until: 0,
            halted: false,
            in_isr: false,
            serviced: [0; 2],
            pending_reset: Some(ResetEvent {
                source: ResetSource::PowerOn,
                at_cycle: 0,
                last_kick_cycle: 0,
                boot: 0,
            }),
            history: Vec::new(),
        }
    }

    fn reg(&self, reg: Register) -> u8 {
        self.regs[usize::from(reg.address())]
    }

    fn reg_mut(&mut self, reg: Register) -> &mut u8 {
        &mut self.regs[usize::from(reg.address())]
    }

    fn has(&self, reg: Register, position: u8) -> bool {
        self.reg(reg) & bit(position) != 0
    }

    fn is_stale(&self, generation: u32) -> bool {
        self.generation != generation || self.pending_reset.is_some()
    }

    fn is_frozen(&self, generation: u32) -> bool {
        self.is_stale(generation) || self.halted
    }

    fn timer0_period(&self) -> Option<u64> {
        let prescaler = u64::from(prescaler_for_cs(self.reg(TCCR0B) & CS_MASK)?);
        let top = if self.has(TCCR0A, TCCR0A_WGM01) {
            u64::from(self.reg(OCR0A)) + 1
        } else {
            256
        };
        Some(prescaler * top)
    }

    fn timer1_period(&self) -> Option<u64> {
        let prescaler = u64::from(prescaler_for_cs(self.reg(TCCR1B) & CS_MASK)?);
        let top = if self.has(TCCR1B, TCCR1B_WGM12) {
            u64::from(u16::from_le_bytes([self.reg(OCR1AL), self.reg(OCR1AH)])) + 1
        } else {
            65_536
        };
        Some(prescaler * top)
    }

    fn watchdog_timeout_ms(&self) -> Option<u64> {
        let wdtcsr = self.reg(WDTCSR);
        if wdtcsr & bit(WDTCSR_WDE) == 0 {
            return None;
        }
        let index = usize::from((wdtcsr & 0x07) | ((wdtcsr >> 2) & 0x08));
        Some(WATCHDOG_NOMINAL_MS[index.min(WATCHDOG_NOMINAL_MS.len() - 1)])
    }

    fn cycles_to_next_event(&self, core_hz: u32) -> u64 {
        let mut next = u64::MAX;
        if let Some(period) = self.timer0_period() {
            next = next.min(period.saturating_sub(self.timer0_phase));
        }
        if let Some(period) = self.timer1_period() {
            next = next.min(period.saturating_sub(self.timer1_phase));
        }
        if let Some(ms) = self.watchdog_timeout_ms() {
            let timeout = ms_to_cycles(ms, core_hz);
            next = next.min(timeout.saturating_sub(self.watchdog_cycles));
        }
        next.max(1)
    }

    fn tick(&mut self, cycles: u64, core_hz: u32) {
        self.cycle += cycles;

        if let Some(period) = self.timer0_period() {
            self.timer0_phase += cycles;
            if self.timer0_phase >= period {
                self.timer0_phase %= period;
                *self.reg_mut(TIFR0) |= bit(TIFR0_OCF0A);
            }
        }
        if let Some(period) = self.timer1_period() {
            self.timer1_phase += cycles;
            if self.timer1_phase >= period {
                self.timer1_phase %= period;
                *self.reg_mut(TIFR1) |= bit(TIFR1_OCF1A);
            }
        }

        self.watchdog_cycles += cycles;
        if let Some(ms) = self.watchdog_timeout_ms()
            && self.watchdog_cycles >= ms_to_cycles(ms, core_hz)
        {
            self.trigger_reset(ResetSource::Watchdog);
        }
    }

    fn trigger_reset(&mut self, source: ResetSource) {
        if self.pending_reset.is_some() {
            return;
        }
        let event = ResetEvent {
            source,
            at_cycle: self.cycle,
            last_kick_cycle: self.last_kick_cycle,
            boot: self.generation,
        };
        tracing::debug!(source = ?source, cycle = self.cycle, "simulated reset");
        self.pending_reset = Some(event);
        self.history.push(event);
    }

    fn apply_reset(&mut self, source: ResetSource) {
        match source.mcusr_flag() {
            None => {
                // A jump to the reset vector leaves all I/O state as it was.
                *self.reg_mut(SREG) &= !bit(SREG_I);
            }
            Some(flag) => {
                let mcusr = if source == ResetSource::PowerOn {
                    bit(flag)
                } else {
                    self.reg(MCUSR) | bit(flag)
                };
                self.regs = [0; 256];
                *self.reg_mut(MCUSR) = mcusr;
                if mcusr & bit(MCUSR_WDRF) != 0 {
                    // WDRF forces WDE on, at the shortest period.
                    *self.reg_mut(WDTCSR) = bit(WDTCSR_WDE);
                }
                self.timer0_phase = 0;
                self.timer1_phase = 0;
                self.wdce_deadline = None;
                self.eempe_deadline = None;
                self.eeprom_busy_until = 0;
                self.watchdog_cycles = 0;
                self.last_kick_cycle = self.cycle;
            }
        }
        self.halted = false;
        self.in_isr = false;
        self.generation += 1;
        self.boot_cycle = self.cycle;
        self.pending_reset = None;
    }

    fn dispatchable(&self) -> Option<Vector> {
        if self.in_isr || self.halted || self.pending_reset.is_some() || !self.has(SREG, SREG_I)
        {
            return None;
        }
        if self.has(TIMSK1, TIMSK1_OCIE1A) && self.has(TIFR1, TIFR1_OCF1A) {
            return Some(Vector::Timer1CompA);
        }
        if self.has(TIMSK0, TIMSK0_OCIE0A) && self.has(TIFR0, TIFR0_OCF0A) {
            return Some(Vector::Timer0CompA);
        }
        None
    }

    fn enter_isr(&mut self, vector: Vector) {
        match vector {
            Vector::Timer1CompA => {
                *self.reg_mut(TIFR1) &= !bit(TIFR1_OCF1A);
                self.serviced[0] += 1;
            }
            Vector::Timer0CompA => {
                *self.reg_mut(TIFR0) &= !bit(TIFR0_OCF0A);
                self.serviced[1] += 1;
            }
        }
        *self.reg_mut(SREG) &= !bit(SREG_I);
        self.in_isr = true;
    }

    fn leave_isr(&mut self, generation: u32) -> bool {
        if self.is_frozen(generation) {
            return false;
        }
        self.in_isr = false;
        *self.reg_mut(SREG) |= bit(SREG_I);
        true
    }

    fn eeprom_address(&self) -> usize {
        (usize::from(self.reg(EEARH) & 0x03) << 8) | usize::from(self.reg(EEARL))
    }

    fn read(&self, reg: Register) -> u8 {
        if reg == EECR {
            let mut value = self.reg(EECR) & !(bit(EECR_EEPE) | bit(EECR_EEMPE));
            if self.cycle < self.eeprom_busy_until {
                value |= bit(EECR_EEPE);
            }
            if self.eempe_deadline.is_some_and(|deadline| self.cycle <= deadline) {
                value |= bit(EECR_EEMPE);
            }
            return value;
        }
        if reg == TCNT0 {
            return self
                .timer0_period()
                .and_then(|_| prescaler_for_cs(self.reg(TCCR0B)))
                .map_or(self.reg(TCNT0), |prescaler| {
                    u8::try_from(self.timer0_phase / u64::from(prescaler)).unwrap_or(u8::MAX)
                });
        }
        self.reg(reg)
    }

    /// Apply a register write. Returns extra stall cycles.
    fn write(&mut self, reg: Register, value: u8, core_hz: u32) -> u64 {
        match reg {
            MCUSR => {
                *self.reg_mut(MCUSR) &= value;
                0
            }
            WDTCSR => {
                self.write_wdtcsr(value);
                0
            }
            TIFR0 | TIFR1 => {
                *self.reg_mut(reg) &= !value;
                0
            }
            TCNT0 => {
                self.timer0_phase = 0;
                *self.reg_mut(reg) = value;
                0
            }
            TCNT1L | TCNT1H => {
                self.timer1_phase = 0;
                *self.reg_mut(reg) = value;
                0
            }
            EECR => self.write_eecr(value, core_hz),
            _ => {
                *self.reg_mut(reg) = value;
                0
            }
        }
    }

    fn write_wdtcsr(&mut self, value: u8) {
        let current = self.reg(WDTCSR);
        let window_open = self
            .wdce_deadline
            .is_some_and(|deadline| self.cycle <= deadline);
        let wde = bit(WDTCSR_WDE);
        let wdce = bit(WDTCSR_WDCE);
        let wdie = bit(WDTCSR_WDIE);

        let mut next = if window_open && value & wdce == 0 {
            self.wdce_deadline = None;
            value & (wde | wdie | WDTCSR_WDP_MASK)
        } else if value & (wdce | wde) == wdce | wde {
            self.wdce_deadline = Some(self.cycle + TIMED_SEQUENCE_CYCLES);
            current | wde
        } else {
            if !window_open {
                self.wdce_deadline = None;
            }
            // Outside the timed window WDE can be set but never cleared, and
            // the prescaler is locked.
            (current & (wde | WDTCSR_WDP_MASK)) | (value & (wde | wdie))
        };

        if self.has(MCUSR, MCUSR_WDRF) {
            next |= wde;
        }
        if current & wde == 0 && next & wde != 0 {
            self.watchdog_cycles = 0;
            self.last_kick_cycle = self.cycle;
        }
        *self.reg_mut(WDTCSR) = next;
    }

    fn write_eecr(&mut self, value: u8, core_hz: u32) -> u64 {
        let busy = self.cycle < self.eeprom_busy_until;
        let window_open = self
            .eempe_deadline
            .is_some_and(|deadline| self.cycle <= deadline);
        let mut stall = 0;

        if value & bit(EECR_EERE) != 0 && !busy {
            let address = self.eeprom_address();
            *self.reg_mut(EEDR) = self.eeprom[address];
            stall = EEPROM_READ_STALL_CYCLES;
        }

        if value & bit(EECR_EEPE) != 0 {
            if window_open && !busy {
                let address = self.eeprom_address();
                self.eeprom[address] = self.reg(EEDR);
                self.eeprom_writes[address] += 1;
                self.eeprom_busy_until =
                    self.cycle + EEPROM_PROGRAM_US * u64::from(core_hz) / 1_000_000;
                self.eempe_deadline = None;
                stall = EEPROM_WRITE_STALL_CYCLES;
            }
        } else if value & bit(EECR_EEMPE) != 0 {
            self.eempe_deadline = Some(self.cycle + TIMED_SEQUENCE_CYCLES);
        }

        // EEPM1:0 are the only plain storage bits.
        *self.reg_mut(EECR) = value & 0x30;
        stall
    }
}

fn ms_to_cycles(ms: u64, core_hz: u32) -> u64 {
    ms * u64::from(core_hz) / 1_000
}

/// Persistent part of the simulated board.
#[derive(Debug)]
pub struct SimBoard {
    core_clock_hz: u32,
    spin_cycles: u64,
    state: RefCell<BoardState>,
}

impl SimBoard {
    /// A freshly powered 16 MHz board with erased EEPROM.
    #[must_use]
    pub fn new() -> Self {
        Self::with_core_clock(DEFAULT_CORE_CLOCK_HZ)
    }

    /// A freshly powered board running at `core_clock_hz`.
    #[must_use]
    pub fn with_core_clock(core_clock_hz: u32) -> Self {
        Self {
            core_clock_hz,
            spin_cycles: DEFAULT_SPIN_CYCLES,
            state: RefCell::new(BoardState::new()),
        }
    }

    /// Set how many cycles one busy-wait iteration costs.
    #[must_use]
    pub fn with_spin_cycles(mut self, cycles: u64) -> Self {
        self.spin_cycles = cycles.max(1);
        self
    }

    /// Preload EEPROM bytes starting at `offset`.
    #[must_use]
    pub fn with_eeprom(self, offset: usize, bytes: &[u8]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            for (slot, byte) in state.eeprom.iter_mut().skip(offset).zip(bytes) {
                *slot = *byte;
            }
        }
        self
    }

    /// Core clock in Hz.
    #[must_use]
    pub fn core_clock_hz(&self) -> u32 {
        self.core_clock_hz
    }

    /// Cycles per millisecond.
    #[must_use]
    pub fn cycles_per_ms(&self) -> u64 {
        ms_to_cycles(1, self.core_clock_hz)
    }

    /// Start the next session, applying the pending reset.
    ///
    /// The first call performs the power-on reset.
    pub fn boot<'h>(&self) -> SimCpu<'_, 'h> {
        let mut state = self.state.borrow_mut();
        let source = state
            .pending_reset
            .map_or(ResetSource::External, |event| event.source);
        state.apply_reset(source);
        SimCpu {
            board: self,
            generation: state.generation,
            sink: Cell::new(None),
        }
    }

    /// Pull the reset pin.
    pub fn press_reset(&self) {
        self.state.borrow_mut().trigger_reset(ResetSource::External);
    }

    /// Dip the supply below the brown-out threshold.
    pub fn brown_out(&self) {
        self.state.borrow_mut().trigger_reset(ResetSource::BrownOut);
    }

    /// Remove and restore power.
    pub fn power_cycle(&self) {
        self.state.borrow_mut().trigger_reset(ResetSource::PowerOn);
    }

    /// Reset that terminated the current session, if any.
    #[must_use]
    pub fn pending_reset(&self) -> Option<ResetEvent> {
        self.state.borrow().pending_reset
    }

    /// Every reset observed so far, oldest first (the initial power-on is
    /// not included).
    #[must_use]
    pub fn reset_history(&self) -> Vec<ResetEvent> {
        self.state.borrow().history.clone()
    }

    /// Total elapsed board time in cycles.
    #[must_use]
    pub fn elapsed_cycles(&self) -> u64 {
        self.state.borrow().cycle
    }

    /// Copy of the EEPROM contents.
    #[must_use]
    pub fn eeprom(&self) -> Vec<u8> {
        self.state.borrow().eeprom.to_vec()
    }

    /// Overwrite one EEPROM byte behind the firmware's back.
    pub fn poke_eeprom(&self, address: usize, value: u8) {
        if let Some(slot) = self.state.borrow_mut().eeprom.get_mut(address) {
            *slot = value;
        }
    }

    /// Number of times the cell at `address` was programmed.
    #[must_use]
    pub fn eeprom_write_count(&self, address: usize) -> u32 {
        self.state
            .borrow()
            .eeprom_writes
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    /// Number of cell programming operations across the whole EEPROM.
    #[must_use]
    pub fn total_eeprom_writes(&self) -> u64 {
        self.state
            .borrow()
            .eeprom_writes
            .iter()
            .map(|&count| u64::from(count))
            .sum()
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

/// One boot session of a [`SimBoard`].
///
/// `'h` is the lifetime of the attached vector table, which usually borrows
/// the components that in turn borrow this session.
pub struct SimCpu<'b, 'h> {
    board: &'b SimBoard,
    generation: u32,
    sink: Cell<Option<&'h dyn InterruptSink>>,
}

impl core::fmt::Debug for SimCpu<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimCpu")
            .field("generation", &self.generation)
            .field("attached", &self.sink.get().is_some())
            .finish_non_exhaustive()
    }
}

impl<'h> SimCpu<'_, 'h> {
    /// Install the vector table.
    pub fn attach(&self, sink: &'h dyn InterruptSink) {
        self.sink.set(Some(sink));
        self.service_interrupts();
    }

    /// Remove the vector table. Pending flags stay pending.
    pub fn detach(&self) {
        self.sink.set(None);
    }

    /// Boot number of this session.
    #[must_use]
    pub fn boot_number(&self) -> u32 {
        self.generation
    }

    /// Whether the core is stuck in a non-terminating loop.
    #[must_use]
    pub fn is_halted(&self) -> bool {
        let state = self.board.state.borrow();
        state.generation == self.generation && state.halted
    }

    /// Whether this session has ended (reset pending or superseded).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.board.state.borrow().is_stale(self.generation)
    }

    /// Cycles since this session booted.
    #[must_use]
    pub fn uptime_cycles(&self) -> u64 {
        let state = self.board.state.borrow();
        state.cycle - state.boot_cycle
    }

    /// Milliseconds since this session booted.
    #[must_use]
    pub fn uptime_ms(&self) -> u64 {
        self.uptime_cycles() / self.board.cycles_per_ms()
    }

    /// Read a register without spending a cycle or dispatching interrupts.
    #[must_use]
    pub fn peek(&self, reg: Register) -> u8 {
        self.board.state.borrow().read(reg)
    }

    /// Period the watchdog is currently armed with, if enabled.
    #[must_use]
    pub fn watchdog_timeout_ms(&self) -> Option<u64> {
        self.board.state.borrow().watchdog_timeout_ms()
    }

    /// Number of times `vector` has been serviced since power-on.
    #[must_use]
    pub fn interrupts_serviced(&self, vector: Vector) -> u64 {
        let state = self.board.state.borrow();
        match vector {
            Vector::Timer1CompA => state.serviced[0],
            Vector::Timer0CompA => state.serviced[1],
        }
    }

    /// Let `cycles` of board time pass, servicing interrupts as they fall
    /// due. Time spent in handlers counts toward `cycles`.
    pub fn advance_cycles(&self, cycles: u64) {
        let core_hz = self.board.core_clock_hz;
        let target = self.board.elapsed_cycles().saturating_add(cycles);
        loop {
            let step = {
                let state = self.board.state.borrow();
                if state.is_stale(self.generation) || state.cycle >= target {
                    return;
                }
                state.cycles_to_next_event(core_hz).min(target - state.cycle)
            };
            self.board.state.borrow_mut().tick(step, core_hz);
            self.service_interrupts();
        }
    }

    /// Let `ms` milliseconds pass.
    pub fn advance_ms(&self, ms: u32) {
        self.advance_cycles(ms_to_cycles(u64::from(ms), self.board.core_clock_hz));
    }

    /// Drive the session: call `main_loop` repeatedly (one busy-wait
    /// iteration after each call) while the core is live, let time pass
    /// while it is halted, and stop at the first reset or after `max_ms`.
    pub fn run(&self, max_ms: u32, mut main_loop: impl FnMut()) -> Option<ResetEvent> {
        let budget = ms_to_cycles(u64::from(max_ms), self.board.core_clock_hz);
        let deadline = self.board.elapsed_cycles() + budget;
        loop {
            if let Some(event) = self.board.pending_reset() {
                return Some(event);
            }
            let now = self.board.elapsed_cycles();
            if now >= deadline || self.is_stopped() {
                return None;
            }
            if self.is_halted() {
                self.advance_cycles(deadline - now);
            } else {
                main_loop();
                self.spin();
            }
        }
    }

    fn elapse(&self, cycles: u64) {
        let mut state = self.board.state.borrow_mut();
        if state.is_stale(self.generation) {
            return;
        }
        state.tick(cycles, self.board.core_clock_hz);
    }

    fn service_interrupts(&self) {
        loop {
            let Some(sink) = self.sink.get() else {
                return;
            };
            let vector = {
                let mut state = self.board.state.borrow_mut();
                if state.is_stale(self.generation) {
                    return;
                }
                let Some(vector) = state.dispatchable() else {
                    return;
                };
                state.enter_isr(vector);
                vector
            };
            self.elapse(ISR_ENTRY_CYCLES);
            sink.on_interrupt(vector);
            if !self.board.state.borrow_mut().leave_isr(self.generation) {
                return;
            }
            self.elapse(ISR_EXIT_CYCLES);
        }
    }
}

impl crate::register::RegisterBus for SimCpu<'_, '_> {
    fn read(&self, reg: Register) -> u8 {
        let value = {
            let state = self.board.state.borrow();
            if state.is_frozen(self.generation) {
                return 0;
            }
            state.read(reg)
        };
        self.elapse(1);
        self.service_interrupts();
        value
    }

    fn write(&self, reg: Register, value: u8) {
        let stall = {
            let mut state = self.board.state.borrow_mut();
            if state.is_frozen(self.generation) {
                return;
            }
            state.write(reg, value, self.board.core_clock_hz)
        };
        self.elapse(1 + stall);
        self.service_interrupts();
    }
}

impl Cpu for SimCpu<'_, '_> {
    fn core_clock_hz(&self) -> u32 {
        self.board.core_clock_hz
    }

    fn watchdog_reset(&self) {
        {
            let mut state = self.board.state.borrow_mut();
            if state.is_frozen(self.generation) {
                return;
            }
            state.watchdog_cycles = 0;
            state.last_kick_cycle = state.cycle;
        }
        self.elapse(1);
        self.service_interrupts();
    }

    fn spin(&self) {
        if self.is_halted() {
            return;
        }
        self.advance_cycles(self.board.spin_cycles);
    }

    fn halt(&self) {
        let mut state = self.board.state.borrow_mut();
        if state.is_frozen(self.generation) {
            return;
        }
        tracing::debug!(cycle = state.cycle, "simulated core halted");
        state.halted = true;
    }

    fn jump_to_reset(&self) {
        let mut state = self.board.state.borrow_mut();
        if state.is_frozen(self.generation) {
            return;
        }
        state.trigger_reset(ResetSource::SoftwareJump);
    }
}
