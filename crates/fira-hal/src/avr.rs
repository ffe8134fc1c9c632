//! Real ATmega328P implementation of the capability traits.

use core::arch::asm;
use core::ptr;

use crate::cpu::Cpu;
use crate::register::{Register, RegisterBus};

/// The ATmega328P this firmware runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atmega328p {
    core_clock_hz: u32,
}

impl Atmega328p {
    /// Describe the running core.
    #[must_use]
    pub const fn new(core_clock_hz: u32) -> Self {
        Self { core_clock_hz }
    }
}

#[expect(unsafe_code, reason = "volatile MMIO and AVR-specific instructions")]
impl RegisterBus for Atmega328p {
    #[inline(always)]
    fn read(&self, reg: Register) -> u8 {
        let addr = ptr::with_exposed_provenance::<u8>(usize::from(reg.address()));
        // SAFETY: `Register` only names I/O addresses of this device, which are
        // always mapped and valid for byte reads.
        unsafe { ptr::read_volatile(addr) }
    }

    #[inline(always)]
    fn write(&self, reg: Register, value: u8) {
        let addr = ptr::with_exposed_provenance_mut::<u8>(usize::from(reg.address()));
        // SAFETY: as for `read`; I/O registers are valid for byte writes.
        unsafe { ptr::write_volatile(addr, value) }
    }
}

#[expect(unsafe_code, reason = "volatile MMIO and AVR-specific instructions")]
impl Cpu for Atmega328p {
    fn core_clock_hz(&self) -> u32 {
        self.core_clock_hz
    }

    #[inline(always)]
    fn watchdog_reset(&self) {
        // SAFETY: `wdr` has no operands and only restarts the watchdog counter.
        unsafe { asm!("wdr", options(nomem, nostack, preserves_flags)) }
    }

    #[inline(always)]
    fn spin(&self) {
        core::hint::spin_loop();
    }

    fn halt(&self) {
        loop {
            // SAFETY: `nop` has no effects.
            unsafe { asm!("nop", options(nomem, nostack, preserves_flags)) }
        }
    }

    fn jump_to_reset(&self) {
        // SAFETY: address 0 holds the reset vector; jumping there restarts the
        // C runtime. Nothing after this executes.
        unsafe { asm!("jmp 0", options(noreturn)) }
    }

    #[inline(always)]
    fn enable_interrupts(&self) {
        // SAFETY: `sei` only sets the I flag.
        unsafe { asm!("sei", options(nomem, nostack)) }
    }

    #[inline(always)]
    fn disable_interrupts(&self) {
        // SAFETY: `cli` only clears the I flag.
        unsafe { asm!("cli", options(nomem, nostack)) }
    }
}
