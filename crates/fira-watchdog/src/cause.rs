//! Reset-cause capture and classification.
//!
//! `MCUSR` holds one flag per reset source and the flags accumulate until
//! software clears them. The value is captured exactly once per boot, before
//! anything else runs, and stays immutable for the rest of the session.

use bitflags::bitflags;
use fira_hal::atmega328p::{MCUSR_BORF, MCUSR_EXTRF, MCUSR_PORF, MCUSR_WDRF};
use fira_hal::bit;
use portable_atomic::{AtomicU16, Ordering};

bitflags! {
    /// Reset flags as laid out in `MCUSR`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResetCause: u8 {
        /// Power-on reset.
        const POWER_ON = bit(MCUSR_PORF);
        /// External reset pin.
        const EXTERNAL = bit(MCUSR_EXTRF);
        /// Brown-out detector.
        const BROWN_OUT = bit(MCUSR_BORF);
        /// Watchdog system reset.
        const WATCHDOG = bit(MCUSR_WDRF);
    }
}

/// The single most relevant reset source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetKind {
    /// The watchdog expired.
    Watchdog,
    /// Supply voltage dropped.
    BrownOut,
    /// Reset pin.
    External,
    /// Power applied.
    PowerOn,
    /// No flag set, e.g. a jump to the reset vector.
    Unknown,
}

impl ResetKind {
    /// Classify by priority: watchdog, brown-out, external, power-on.
    #[must_use]
    pub const fn classify(cause: ResetCause) -> Self {
        if cause.contains(ResetCause::WATCHDOG) {
            Self::Watchdog
        } else if cause.contains(ResetCause::BROWN_OUT) {
            Self::BrownOut
        } else if cause.contains(ResetCause::EXTERNAL) {
            Self::External
        } else if cause.contains(ResetCause::POWER_ON) {
            Self::PowerOn
        } else {
            Self::Unknown
        }
    }

    /// Get the kind as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Watchdog => "Watchdog",
            Self::BrownOut => "BrownOut",
            Self::External => "External",
            Self::PowerOn => "PowerOn",
            Self::Unknown => "Unknown",
        }
    }
}

impl core::fmt::Display for ResetKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reset flags captured at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResetSnapshot {
    cause: ResetCause,
}

impl ResetSnapshot {
    /// Wrap a raw `MCUSR` value. Reserved bits are dropped.
    #[must_use]
    pub const fn from_raw(mcusr: u8) -> Self {
        Self {
            cause: ResetCause::from_bits_truncate(mcusr),
        }
    }

    /// Captured flags.
    #[must_use]
    pub const fn cause(self) -> ResetCause {
        self.cause
    }

    /// Captured flags as a raw bitmask.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.cause.bits()
    }

    /// Prioritised classification of the flags.
    #[must_use]
    pub const fn kind(self) -> ResetKind {
        ResetKind::classify(self.cause)
    }

    /// Whether the watchdog flag is set.
    #[must_use]
    pub const fn was_watchdog(self) -> bool {
        self.cause.contains(ResetCause::WATCHDOG)
    }
}

const LATCHED: u16 = 0x0100;

/// Write-once holder for the boot's [`ResetSnapshot`].
///
/// On the target this lives in a `static` that is zeroed by the C runtime on
/// every boot.
#[derive(Debug, Default)]
pub struct ResetLatch {
    slot: AtomicU16,
}

impl ResetLatch {
    /// An empty latch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: AtomicU16::new(0),
        }
    }

    /// Store the value produced by `read` unless a snapshot is already held.
    ///
    /// Returns the held snapshot, which is the first one ever captured.
    /// `read` is not called when the latch is already full.
    pub fn capture(&self, read: impl FnOnce() -> u8) -> ResetSnapshot {
        if let Some(snapshot) = self.get() {
            return snapshot;
        }
        let raw = LATCHED | u16::from(read());
        match self
            .slot
            .compare_exchange(0, raw, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => Self::decode(raw),
            Err(held) => Self::decode(held),
        }
    }

    /// The held snapshot, if one was captured.
    #[must_use]
    pub fn get(&self) -> Option<ResetSnapshot> {
        let raw = self.slot.load(Ordering::Acquire);
        (raw & LATCHED != 0).then(|| Self::decode(raw))
    }

    fn decode(raw: u16) -> ResetSnapshot {
        ResetSnapshot::from_raw(raw.to_le_bytes()[0])
    }
}
