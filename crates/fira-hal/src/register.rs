//! Narrow register capability used by every FIRA component.
//!
//! Components never touch raw addresses. They depend on [`RegisterBus`],
//! which is implemented once for the real target and once for the host
//! simulator.

/// An 8-bit memory-mapped I/O register, identified by its data-space address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

impl Register {
    /// Create a register handle for a data-space address.
    #[must_use]
    pub const fn at(address: u8) -> Self {
        Self(address)
    }

    /// Data-space address of the register.
    #[must_use]
    pub const fn address(self) -> u8 {
        self.0
    }
}

/// Bit mask for a single bit position.
#[must_use]
#[inline]
pub const fn bit(position: u8) -> u8 {
    1 << (position & 0x07)
}

/// Read/write access to memory-mapped I/O registers.
///
/// Only [`read`](RegisterBus::read) and [`write`](RegisterBus::write) are
/// required. The provided bit and word helpers are plain read-modify-write
/// sequences and are *not* atomic with respect to interrupts: callers that
/// share a register with an interrupt handler must hold an
/// [`InterruptGuard`](crate::critical::InterruptGuard).
pub trait RegisterBus {
    /// Read a register.
    fn read(&self, reg: Register) -> u8;

    /// Write a register.
    fn write(&self, reg: Register, value: u8);

    /// Read a single bit.
    fn get_bit(&self, reg: Register, position: u8) -> bool {
        self.read(reg) & bit(position) != 0
    }

    /// Set a single bit (read-modify-write).
    fn set_bit(&self, reg: Register, position: u8) {
        let value = self.read(reg);
        self.write(reg, value | bit(position));
    }

    /// Clear a single bit (read-modify-write).
    fn clear_bit(&self, reg: Register, position: u8) {
        let value = self.read(reg);
        self.write(reg, value & !bit(position));
    }

    /// Replace the bits selected by `mask` with the matching bits of `value`.
    fn modify(&self, reg: Register, mask: u8, value: u8) {
        let current = self.read(reg);
        self.write(reg, (current & !mask) | (value & mask));
    }

    /// Read a 16-bit register pair, low byte first.
    ///
    /// Reading the low byte latches the high byte on AVR, so the order matters.
    fn read_word(&self, low: Register, high: Register) -> u16 {
        let lo = self.read(low);
        let hi = self.read(high);
        u16::from_le_bytes([lo, hi])
    }

    /// Write a 16-bit register pair, high byte first.
    fn write_word(&self, low: Register, high: Register, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(high, hi);
        self.write(low, lo);
    }
}

impl<B: RegisterBus + ?Sized> RegisterBus for &B {
    fn read(&self, reg: Register) -> u8 {
        (**self).read(reg)
    }

    fn write(&self, reg: Register, value: u8) {
        (**self).write(reg, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;

    struct Flat(RefCell<[u8; 256]>);

    impl RegisterBus for Flat {
        fn read(&self, reg: Register) -> u8 {
            self.0.borrow()[usize::from(reg.address())]
        }

        fn write(&self, reg: Register, value: u8) {
            self.0.borrow_mut()[usize::from(reg.address())] = value;
        }
    }

    #[test]
    fn test_bit_helpers() {
        let bus = Flat(RefCell::new([0; 256]));
        let reg = Register::at(0x44);

        bus.set_bit(reg, 1);
        bus.set_bit(reg, 7);
        assert_eq!(bus.read(reg), 0b1000_0010);
        assert!(bus.get_bit(reg, 7));

        bus.clear_bit(reg, 7);
        assert_eq!(bus.read(reg), 0b0000_0010);

        bus.modify(reg, 0x0F, 0xA5);
        assert_eq!(bus.read(reg), 0x05);
    }

    #[test]
    fn test_word_is_little_endian() {
        let bus = Flat(RefCell::new([0; 256]));
        bus.write_word(Register::at(0x88), Register::at(0x89), 46_874);
        assert_eq!(bus.read(Register::at(0x88)), 0x1A);
        assert_eq!(bus.read(Register::at(0x89)), 0xB7);
        assert_eq!(bus.read_word(Register::at(0x88), Register::at(0x89)), 46_874);
    }
}
