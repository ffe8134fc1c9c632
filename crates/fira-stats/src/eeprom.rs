//! Byte-addressed non-volatile storage.
//!
//! Multi-byte values are stored little-endian. Addresses wrap modulo the
//! device size, as the address register ignores bits above the last cell.
//! The `update_*` operations compare the whole stored value and, when it
//! differs, rewrite the whole value. Cells endure roughly 100k programming
//! cycles, so periodic writers should always go through `update_*`.

use core::cell::{Cell, RefCell};

use fira_hal::atmega328p::{
    EEARH, EEARL, EECR, EECR_EEMPE, EECR_EEPE, EECR_EERE, EEDR, EEPROM_SIZE,
};
use fira_hal::{Cpu, InterruptGuard};

use crate::error::{EepromError, EepromResult};

/// Capacity of the ATmega328P EEPROM in bytes.
pub const CAPACITY: u16 = 1024;

const _: () = assert!(CAPACITY as usize == EEPROM_SIZE);

/// Non-volatile byte store.
pub trait Eeprom {
    /// Device size in bytes.
    fn capacity(&self) -> u16 {
        CAPACITY
    }

    /// Read one byte.
    fn read_byte(&self, address: u16) -> u8;

    /// Program one byte unconditionally.
    fn write_byte(&self, address: u16, value: u8);

    /// Read a little-endian `u16`.
    fn read_word(&self, address: u16) -> u16 {
        u16::from_le_bytes([
            self.read_byte(address),
            self.read_byte(address.wrapping_add(1)),
        ])
    }

    /// Read a little-endian `u32`.
    fn read_dword(&self, address: u16) -> u32 {
        let mut bytes = [0; 4];
        for (offset, byte) in (0..).zip(bytes.iter_mut()) {
            *byte = self.read_byte(address.wrapping_add(offset));
        }
        u32::from_le_bytes(bytes)
    }

    /// Program a little-endian `u16`.
    fn write_word(&self, address: u16, value: u16) {
        for (offset, byte) in (0..).zip(value.to_le_bytes()) {
            self.write_byte(address.wrapping_add(offset), byte);
        }
    }

    /// Program a little-endian `u32`.
    fn write_dword(&self, address: u16, value: u32) {
        for (offset, byte) in (0..).zip(value.to_le_bytes()) {
            self.write_byte(address.wrapping_add(offset), byte);
        }
    }

    /// Program `value` only if it differs. Returns whether a write happened.
    fn update_byte(&self, address: u16, value: u8) -> bool {
        let changed = self.read_byte(address) != value;
        if changed {
            self.write_byte(address, value);
        }
        changed
    }

    /// Program `value` only if it differs. Returns whether a write happened.
    fn update_word(&self, address: u16, value: u16) -> bool {
        let changed = self.read_word(address) != value;
        if changed {
            self.write_word(address, value);
        }
        changed
    }

    /// Program `value` only if it differs. Returns whether a write happened.
    fn update_dword(&self, address: u16, value: u32) -> bool {
        let changed = self.read_dword(address) != value;
        if changed {
            self.write_dword(address, value);
        }
        changed
    }

    /// Fill `buf` from consecutive cells starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`EepromError::OutOfRange`] if the block runs past the end.
    fn read_block(&self, address: u16, buf: &mut [u8]) -> EepromResult<()> {
        check_block(address, buf.len(), self.capacity())?;
        for (offset, byte) in (0..).zip(buf.iter_mut()) {
            *byte = self.read_byte(address + offset);
        }
        Ok(())
    }

    /// Program `data` into consecutive cells starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`EepromError::OutOfRange`] if the block runs past the end.
    fn write_block(&self, address: u16, data: &[u8]) -> EepromResult<()> {
        check_block(address, data.len(), self.capacity())?;
        for (offset, &byte) in (0..).zip(data) {
            self.write_byte(address + offset, byte);
        }
        Ok(())
    }

    /// Program only the cells of `data` that differ. Returns the number of
    /// cells written.
    ///
    /// # Errors
    ///
    /// Returns [`EepromError::OutOfRange`] if the block runs past the end.
    fn update_block(&self, address: u16, data: &[u8]) -> EepromResult<usize> {
        check_block(address, data.len(), self.capacity())?;
        Ok((0..)
            .zip(data)
            .filter(|&(offset, &byte)| self.update_byte(address + offset, byte))
            .count())
    }
}

impl<E: Eeprom + ?Sized> Eeprom for &E {
    fn capacity(&self) -> u16 {
        (**self).capacity()
    }

    fn read_byte(&self, address: u16) -> u8 {
        (**self).read_byte(address)
    }

    fn write_byte(&self, address: u16, value: u8) {
        (**self).write_byte(address, value);
    }
}

fn check_block(address: u16, len: usize, capacity: u16) -> EepromResult<()> {
    if usize::from(address) + len > usize::from(capacity) {
        return Err(EepromError::out_of_range(address, len, capacity));
    }
    Ok(())
}

/// On-chip EEPROM driven through `EEAR`/`EEDR`/`EECR`.
#[derive(Debug)]
pub struct AvrEeprom<C: Cpu> {
    cpu: C,
}

impl<C: Cpu> AvrEeprom<C> {
    /// Wrap the CPU.
    pub const fn new(cpu: C) -> Self {
        Self { cpu }
    }

    /// Busy-wait until the previous programming operation has finished.
    fn wait_ready(&self) {
        while self.cpu.get_bit(EECR, EECR_EEPE) {
            self.cpu.spin();
        }
    }

    fn select(&self, address: u16) {
        self.wait_ready();
        self.cpu.write_word(EEARL, EEARH, address % CAPACITY);
    }
}

impl<C: Cpu> Eeprom for AvrEeprom<C> {
    fn read_byte(&self, address: u16) -> u8 {
        self.select(address);
        self.cpu.set_bit(EECR, EECR_EERE);
        self.cpu.read(EEDR)
    }

    fn write_byte(&self, address: u16, value: u8) {
        self.select(address);
        self.cpu.write(EEDR, value);
        // EEPE must follow EEMPE within four cycles.
        let _guard = InterruptGuard::new(&self.cpu);
        self.cpu.set_bit(EECR, EECR_EEMPE);
        self.cpu.set_bit(EECR, EECR_EEPE);
    }
}

/// RAM-backed EEPROM for host tests, with per-cell write counters.
pub struct RamEeprom {
    cells: RefCell<[u8; EEPROM_SIZE]>,
    writes: RefCell<[u32; EEPROM_SIZE]>,
    total_writes: Cell<u64>,
}

impl core::fmt::Debug for RamEeprom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RamEeprom")
            .field("total_writes", &self.total_writes.get())
            .finish_non_exhaustive()
    }
}

impl RamEeprom {
    /// An erased device (every cell `0xFF`).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: RefCell::new([0xFF; EEPROM_SIZE]),
            writes: RefCell::new([0; EEPROM_SIZE]),
            total_writes: Cell::new(0),
        }
    }

    /// A device preloaded with `bytes` at `offset`, without counting writes.
    #[must_use]
    pub fn with_contents(offset: u16, bytes: &[u8]) -> Self {
        let eeprom = Self::new();
        for (i, &byte) in (0..).zip(bytes) {
            eeprom.poke(offset.wrapping_add(i), byte);
        }
        eeprom
    }

    /// Overwrite a cell without counting a write.
    pub fn poke(&self, address: u16, value: u8) {
        self.cells.borrow_mut()[index(address)] = value;
    }

    /// Number of times the cell at `address` has been programmed.
    #[must_use]
    pub fn write_count(&self, address: u16) -> u32 {
        self.writes.borrow()[index(address)]
    }

    /// Number of programming operations across all cells.
    #[must_use]
    pub fn total_writes(&self) -> u64 {
        self.total_writes.get()
    }
}

impl Default for RamEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl Eeprom for RamEeprom {
    fn read_byte(&self, address: u16) -> u8 {
        self.cells.borrow()[index(address)]
    }

    fn write_byte(&self, address: u16, value: u8) {
        let i = index(address);
        self.cells.borrow_mut()[i] = value;
        let mut writes = self.writes.borrow_mut();
        writes[i] = writes[i].saturating_add(1);
        self.total_writes.set(self.total_writes.get() + 1);
    }
}

fn index(address: u16) -> usize {
    usize::from(address % CAPACITY)
}
