//! Watchdog timeout bands.

use fira_hal::atmega328p::WDTCSR_WDP3;
use fira_hal::bit;

use crate::error::WatchdogError;

/// One of the ten prescaler settings of the watchdog oscillator.
///
/// Nominal periods assume the 128 kHz watchdog oscillator; the real period
/// varies with supply voltage and temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum WatchdogTimeout {
    /// 16 ms.
    Ms16 = 0,
    /// 32 ms.
    Ms32 = 1,
    /// 64 ms.
    Ms64 = 2,
    /// 125 ms.
    Ms125 = 3,
    /// 250 ms.
    Ms250 = 4,
    /// 500 ms.
    Ms500 = 5,
    /// 1 s.
    S1 = 6,
    /// 2 s.
    S2 = 7,
    /// 4 s.
    S4 = 8,
    /// 8 s.
    S8 = 9,
}

impl WatchdogTimeout {
    /// Every band, shortest first.
    pub const ALL: [Self; 10] = [
        Self::Ms16,
        Self::Ms32,
        Self::Ms64,
        Self::Ms125,
        Self::Ms250,
        Self::Ms500,
        Self::S1,
        Self::S2,
        Self::S4,
        Self::S8,
    ];

    /// Convert from the raw band number `0..=9`.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Ms16),
            1 => Some(Self::Ms32),
            2 => Some(Self::Ms64),
            3 => Some(Self::Ms125),
            4 => Some(Self::Ms250),
            5 => Some(Self::Ms500),
            6 => Some(Self::S1),
            7 => Some(Self::S2),
            8 => Some(Self::S4),
            9 => Some(Self::S8),
            _ => None,
        }
    }

    /// Raw band number.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Nominal period in milliseconds.
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        match self {
            Self::Ms16 => 16,
            Self::Ms32 => 32,
            Self::Ms64 => 64,
            Self::Ms125 => 125,
            Self::Ms250 => 250,
            Self::Ms500 => 500,
            Self::S1 => 1_000,
            Self::S2 => 2_000,
            Self::S4 => 4_000,
            Self::S8 => 8_000,
        }
    }

    /// Prescaler bits as laid out in `WDTCSR` (`WDP3` is bit 5).
    #[must_use]
    pub const fn prescaler_bits(self) -> u8 {
        let band = self.bits();
        let high = if band > 7 { bit(WDTCSR_WDP3) } else { 0 };
        high | (band & 0x07)
    }

    /// Decode the prescaler field of a `WDTCSR` value.
    #[must_use]
    pub const fn from_wdtcsr(wdtcsr: u8) -> Option<Self> {
        let high = if wdtcsr & bit(WDTCSR_WDP3) != 0 { 8 } else { 0 };
        Self::from_bits(high | (wdtcsr & 0x07))
    }
}

impl TryFrom<u8> for WatchdogTimeout {
    type Error = WatchdogError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits).ok_or(WatchdogError::InvalidTimeout(bits))
    }
}

impl core::fmt::Display for WatchdogTimeout {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let ms = self.as_millis();
        if ms >= 1_000 {
            write!(f, "{} s", ms / 1_000)
        } else {
            write!(f, "{ms} ms")
        }
    }
}
