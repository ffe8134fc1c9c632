//! ATmega328P register map (data-space addresses) and bit positions.

use crate::register::Register;

/// Status register.
pub const SREG: Register = Register::at(0x5F);
/// Global interrupt enable bit in `SREG`.
pub const SREG_I: u8 = 7;

/// MCU status register (reset cause flags).
pub const MCUSR: Register = Register::at(0x54);
/// Power-on reset flag.
pub const MCUSR_PORF: u8 = 0;
/// External reset flag.
pub const MCUSR_EXTRF: u8 = 1;
/// Brown-out reset flag.
pub const MCUSR_BORF: u8 = 2;
/// Watchdog reset flag.
pub const MCUSR_WDRF: u8 = 3;

/// Watchdog timer control register.
pub const WDTCSR: Register = Register::at(0x60);
/// Prescaler bit 0.
pub const WDTCSR_WDP0: u8 = 0;
/// Prescaler bit 1.
pub const WDTCSR_WDP1: u8 = 1;
/// Prescaler bit 2.
pub const WDTCSR_WDP2: u8 = 2;
/// System reset enable.
pub const WDTCSR_WDE: u8 = 3;
/// Change enable (opens the timed window).
pub const WDTCSR_WDCE: u8 = 4;
/// Prescaler bit 3 (not contiguous with WDP2..0).
pub const WDTCSR_WDP3: u8 = 5;
/// Watchdog interrupt enable.
pub const WDTCSR_WDIE: u8 = 6;
/// Watchdog interrupt flag.
pub const WDTCSR_WDIF: u8 = 7;
/// Mask of the four prescaler bits in `WDTCSR`.
pub const WDTCSR_WDP_MASK: u8 = 0b0010_0111;

/// Timer/Counter0 control A.
pub const TCCR0A: Register = Register::at(0x44);
/// Timer/Counter0 control B.
pub const TCCR0B: Register = Register::at(0x45);
/// Timer/Counter0 value.
pub const TCNT0: Register = Register::at(0x46);
/// Timer/Counter0 output compare A.
pub const OCR0A: Register = Register::at(0x47);
/// Timer/Counter0 interrupt mask.
pub const TIMSK0: Register = Register::at(0x6E);
/// Timer/Counter0 interrupt flags.
pub const TIFR0: Register = Register::at(0x35);
/// Waveform generation bit 1 (CTC when alone).
pub const TCCR0A_WGM01: u8 = 1;
/// Clock select bit 0.
pub const TCCR0B_CS00: u8 = 0;
/// Clock select bit 1.
pub const TCCR0B_CS01: u8 = 1;
/// Clock select bit 2.
pub const TCCR0B_CS02: u8 = 2;
/// Compare match A interrupt enable.
pub const TIMSK0_OCIE0A: u8 = 1;
/// Compare match A flag.
pub const TIFR0_OCF0A: u8 = 1;

/// Timer/Counter1 control A.
pub const TCCR1A: Register = Register::at(0x80);
/// Timer/Counter1 control B.
pub const TCCR1B: Register = Register::at(0x81);
/// Timer/Counter1 value, low byte.
pub const TCNT1L: Register = Register::at(0x84);
/// Timer/Counter1 value, high byte.
pub const TCNT1H: Register = Register::at(0x85);
/// Timer/Counter1 output compare A, low byte.
pub const OCR1AL: Register = Register::at(0x88);
/// Timer/Counter1 output compare A, high byte.
pub const OCR1AH: Register = Register::at(0x89);
/// Timer/Counter1 interrupt mask.
pub const TIMSK1: Register = Register::at(0x6F);
/// Timer/Counter1 interrupt flags.
pub const TIFR1: Register = Register::at(0x36);
/// Clock select bit 0.
pub const TCCR1B_CS10: u8 = 0;
/// Clock select bit 1.
pub const TCCR1B_CS11: u8 = 1;
/// Clock select bit 2.
pub const TCCR1B_CS12: u8 = 2;
/// Waveform generation bit 2 (CTC, TOP = OCR1A).
pub const TCCR1B_WGM12: u8 = 3;
/// Compare match A interrupt enable.
pub const TIMSK1_OCIE1A: u8 = 1;
/// Compare match A flag.
pub const TIFR1_OCF1A: u8 = 1;

/// Mask of the three clock-select bits shared by `TCCR0B` and `TCCR1B`.
pub const CS_MASK: u8 = 0b0000_0111;

/// EEPROM control register.
pub const EECR: Register = Register::at(0x3F);
/// EEPROM data register.
pub const EEDR: Register = Register::at(0x40);
/// EEPROM address, low byte.
pub const EEARL: Register = Register::at(0x41);
/// EEPROM address, high byte.
pub const EEARH: Register = Register::at(0x42);
/// Read enable.
pub const EECR_EERE: u8 = 0;
/// Program enable.
pub const EECR_EEPE: u8 = 1;
/// Master program enable (opens the timed window).
pub const EECR_EEMPE: u8 = 2;

/// EEPROM size in bytes.
pub const EEPROM_SIZE: usize = 1024;

/// Maximum number of CPU cycles between the two writes of a timed
/// sequence (`WDCE` → `WDE`, `EEMPE` → `EEPE`).
pub const TIMED_SEQUENCE_CYCLES: u64 = 4;

/// Timer prescalers selectable by clock-select values 1..=5.
pub const TIMER_PRESCALERS: [u16; 5] = [1, 8, 64, 256, 1024];

/// Map a clock-select field value to its prescaler, `None` when the timer
/// is stopped or clocked externally.
#[must_use]
pub const fn prescaler_for_cs(cs: u8) -> Option<u16> {
    match cs & CS_MASK {
        1 => Some(1),
        2 => Some(8),
        3 => Some(64),
        4 => Some(256),
        5 => Some(1024),
        _ => None,
    }
}

/// Map a prescaler to its clock-select field value.
#[must_use]
pub const fn cs_for_prescaler(prescaler: u16) -> Option<u8> {
    match prescaler {
        1 => Some(1),
        8 => Some(2),
        64 => Some(3),
        256 => Some(4),
        1024 => Some(5),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prescaler_table_round_trips() {
        for prescaler in TIMER_PRESCALERS {
            let cs = cs_for_prescaler(prescaler);
            assert!(cs.is_some());
            assert_eq!(cs.and_then(prescaler_for_cs), Some(prescaler));
        }
        assert_eq!(prescaler_for_cs(0), None);
        assert_eq!(prescaler_for_cs(6), None);
    }
}
