//! Attack variants executed by the fault interrupt.
//!
//! Exactly one variant is compiled into a firmware image. Each is a
//! zero-sized type implementing [`Attack`], and the injector is generic over
//! it, so the interrupt handler contains only the selected behavior.

use fira_hal::{Cpu, critical};

use crate::victim::VictimCell;

/// Which attack a build carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackMode {
    /// Mode A: flip one bit of the victim.
    BitFlip,
    /// Mode B: jump to the reset vector.
    ControlRedirect,
    /// Mode C: spin forever inside the interrupt.
    Hang,
    /// Baseline: count the fault, do nothing else.
    Safe,
}

impl AttackMode {
    /// Get the mode name as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BitFlip => "BitFlip",
            Self::ControlRedirect => "ControlRedirect",
            Self::Hang => "Hang",
            Self::Safe => "Safe",
        }
    }

    /// Single-letter mode label (`A`, `B`, `C`), `None` for the baseline.
    #[must_use]
    pub const fn letter(self) -> Option<char> {
        match self {
            Self::BitFlip => Some('A'),
            Self::ControlRedirect => Some('B'),
            Self::Hang => Some('C'),
            Self::Safe => None,
        }
    }

    /// Whether the attack ends the session without help from the watchdog.
    #[must_use]
    pub const fn restarts_immediately(self) -> bool {
        matches!(self, Self::ControlRedirect)
    }
}

impl core::fmt::Display for AttackMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one fault interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// A bit of the victim was inverted.
    Flipped {
        /// Byte offset in the little-endian representation.
        byte: u8,
        /// Bit position within that byte.
        bit: u8,
        /// Victim value before the flip.
        before: u32,
        /// Victim value after the flip.
        after: u32,
    },
    /// Bit-flip mode with no victim registered.
    NoVictim,
    /// Execution was sent to the reset vector.
    Redirected,
    /// The core entered the non-terminating loop.
    Hung,
    /// Baseline mode; nothing was done.
    Skipped,
}

impl FaultOutcome {
    /// Whether the current session ends because of this fault.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Redirected | Self::Hung)
    }
}

/// Byte offset and bit position hit by fault number `n`.
///
/// The bit advances by 7 (mod 8) per fault so consecutive faults do not keep
/// hitting the same bit column.
#[must_use]
pub const fn bit_flip_target(n: u16) -> (u8, u8) {
    let byte = (n % 4) as u8;
    let bit = (n.wrapping_mul(7) % 8) as u8;
    (byte, bit)
}

/// Invert the bit selected by [`bit_flip_target`]. Applying it twice with
/// the same `n` restores the value.
#[must_use]
pub const fn apply_bit_flip(value: u32, n: u16) -> u32 {
    let (byte, bit) = bit_flip_target(n);
    value ^ (1_u32 << (byte as u32 * 8 + bit as u32))
}

/// Behavior executed by the fault interrupt after the bookkeeping.
pub trait Attack {
    /// Which mode this is.
    const MODE: AttackMode;

    /// Run the attack for fault number `n` (post-increment count).
    ///
    /// Called with interrupts masked.
    fn execute<C: Cpu + ?Sized>(cpu: &C, n: u16, victim: Option<&VictimCell>) -> FaultOutcome;
}

/// Mode A.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitFlip;

impl Attack for BitFlip {
    const MODE: AttackMode = AttackMode::BitFlip;

    fn execute<C: Cpu + ?Sized>(cpu: &C, n: u16, victim: Option<&VictimCell>) -> FaultOutcome {
        let Some(victim) = victim else {
            return FaultOutcome::NoVictim;
        };
        let (byte, bit) = bit_flip_target(n);
        critical::free(cpu, |cs| {
            let before = victim.load(cs);
            let after = victim.update(cs, |value| apply_bit_flip(value, n));
            FaultOutcome::Flipped {
                byte,
                bit,
                before,
                after,
            }
        })
    }
}

/// Mode B.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControlRedirect;

impl Attack for ControlRedirect {
    const MODE: AttackMode = AttackMode::ControlRedirect;

    fn execute<C: Cpu + ?Sized>(cpu: &C, _n: u16, _victim: Option<&VictimCell>) -> FaultOutcome {
        cpu.jump_to_reset();
        FaultOutcome::Redirected
    }
}

/// Mode C.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hang;

impl Attack for Hang {
    const MODE: AttackMode = AttackMode::Hang;

    fn execute<C: Cpu + ?Sized>(cpu: &C, _n: u16, _victim: Option<&VictimCell>) -> FaultOutcome {
        cpu.halt();
        FaultOutcome::Hung
    }
}

/// Baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Safe;

impl Attack for Safe {
    const MODE: AttackMode = AttackMode::Safe;

    fn execute<C: Cpu + ?Sized>(_cpu: &C, _n: u16, _victim: Option<&VictimCell>) -> FaultOutcome {
        FaultOutcome::Skipped
    }
}
