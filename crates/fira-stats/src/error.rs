//! Error types for EEPROM block access.

use thiserror::Error;

/// Errors that can occur during EEPROM block operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EepromError {
    /// The block does not fit between `address` and the end of the EEPROM.
    #[error("block of {len} bytes at {address:#06x} exceeds EEPROM capacity of {capacity} bytes")]
    OutOfRange {
        /// Start address.
        address: u16,
        /// Block length.
        len: usize,
        /// EEPROM size.
        capacity: u16,
    },
}

impl EepromError {
    /// Create an out-of-range error.
    #[must_use]
    pub const fn out_of_range(address: u16, len: usize, capacity: u16) -> Self {
        Self::OutOfRange {
            address,
            len,
            capacity,
        }
    }
}

/// A specialized `Result` type for EEPROM operations.
pub type EepromResult<T> = core::result::Result<T, EepromError>;

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::string::ToString;

    #[test]
    fn test_error_display() {
        assert_eq!(
            EepromError::out_of_range(1_020, 8, 1_024).to_string(),
            "block of 8 bytes at 0x03fc exceeds EEPROM capacity of 1024 bytes"
        );
    }
}
