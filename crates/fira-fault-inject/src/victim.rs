//! The memory cell attacked by bit-flip faults.

use fira_hal::{CriticalSection, RegisterBus, Shared, critical};

/// A 32-bit counter shared between the foreground and the fault interrupt.
///
/// The owner registers it with the injector by reference; the injector
/// never creates or drops it. Every access goes through a critical section.
#[derive(Debug, Default)]
pub struct VictimCell {
    value: Shared<u32>,
}

impl VictimCell {
    /// Create a cell holding `value`.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self {
            value: Shared::new(value),
        }
    }

    /// Read the value.
    pub fn get<B: RegisterBus + ?Sized>(&self, bus: &B) -> u32 {
        critical::free(bus, |cs| self.value.get(cs))
    }

    /// Overwrite the value.
    pub fn set<B: RegisterBus + ?Sized>(&self, bus: &B, value: u32) {
        critical::free(bus, |cs| self.value.set(cs, value));
    }

    /// Add one (wrapping) and return the new value.
    pub fn increment<B: RegisterBus + ?Sized>(&self, bus: &B) -> u32 {
        critical::free(bus, |cs| self.value.update(cs, |v| v.wrapping_add(1)))
    }

    /// Apply `f` inside an existing critical section; returns the new value.
    pub fn update(&self, cs: CriticalSection<'_>, f: impl FnOnce(u32) -> u32) -> u32 {
        self.value.update(cs, f)
    }

    /// Read inside an existing critical section.
    #[must_use]
    pub fn load(&self, cs: CriticalSection<'_>) -> u32 {
        self.value.get(cs)
    }
}
