//! Interrupt-masking critical sections.
//!
//! The target has a single core and no scheduler, so "mutual exclusion"
//! means masking interrupts: [`InterruptGuard`] saves `SREG`, clears the
//! global interrupt bit and restores the saved value on drop. Restoring
//! (rather than unconditionally re-enabling) keeps nested sections and
//! sections entered from interrupt context correct.
//!
//! Shared state lives in [`Shared`], which can only be read or written with
//! a [`CriticalSection`] token minted by [`free`].

use core::cell::Cell;
use core::sync::atomic::{Ordering, compiler_fence};

pub use critical_section::CriticalSection;
use critical_section::Mutex;

use crate::atmega328p::{SREG, SREG_I};
use crate::register::{RegisterBus, bit};

/// RAII scope with global interrupts masked.
#[derive(Debug)]
#[must_use = "interrupts are re-enabled as soon as the guard is dropped"]
pub struct InterruptGuard<'b, B: RegisterBus + ?Sized> {
    bus: &'b B,
    saved_sreg: u8,
}

impl<'b, B: RegisterBus + ?Sized> InterruptGuard<'b, B> {
    /// Save `SREG` and mask interrupts.
    pub fn new(bus: &'b B) -> Self {
        let saved_sreg = bus.read(SREG);
        bus.write(SREG, saved_sreg & !bit(SREG_I));
        compiler_fence(Ordering::SeqCst);
        Self { bus, saved_sreg }
    }

    /// Whether interrupts were enabled when the guard was taken.
    #[must_use]
    pub fn interrupts_were_enabled(&self) -> bool {
        self.saved_sreg & bit(SREG_I) != 0
    }
}

impl<B: RegisterBus + ?Sized> Drop for InterruptGuard<'_, B> {
    fn drop(&mut self) {
        compiler_fence(Ordering::SeqCst);
        self.bus.write(SREG, self.saved_sreg);
    }
}

/// Run `f` with interrupts masked, handing it a critical-section token.
pub fn free<B, R>(bus: &B, f: impl FnOnce(CriticalSection<'_>) -> R) -> R
where
    B: RegisterBus + ?Sized,
{
    let _guard = InterruptGuard::new(bus);
    #[expect(unsafe_code, reason = "minting a token for the masked region")]
    // SAFETY: the target is single-core and interrupts stay masked until
    // `_guard` drops at the end of this function, after `f` has returned.
    let cs = unsafe { CriticalSection::new() };
    f(cs)
}

/// Value shared between foreground and interrupt context.
///
/// Multi-byte values are not read or written atomically on an 8-bit core,
/// so every access requires a [`CriticalSection`] token.
pub struct Shared<T> {
    inner: Mutex<Cell<T>>,
}

impl<T> core::fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shared").finish_non_exhaustive()
    }
}

impl<T: Copy> Shared<T> {
    /// Create a shared value.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(value)),
        }
    }

    /// Read the value.
    #[must_use]
    pub fn get(&self, cs: CriticalSection<'_>) -> T {
        self.inner.borrow(cs).get()
    }

    /// Overwrite the value.
    pub fn set(&self, cs: CriticalSection<'_>, value: T) {
        self.inner.borrow(cs).set(value);
    }

    /// Overwrite the value, returning the previous one.
    pub fn replace(&self, cs: CriticalSection<'_>, value: T) -> T {
        self.inner.borrow(cs).replace(value)
    }

    /// Apply `f` to the value and return the new value.
    pub fn update(&self, cs: CriticalSection<'_>, f: impl FnOnce(T) -> T) -> T {
        let cell = self.inner.borrow(cs);
        let next = f(cell.get());
        cell.set(next);
        next
    }
}

impl<T: Copy + Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
