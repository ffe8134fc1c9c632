//! CPU capability and interrupt vectors.

use crate::atmega328p::{SREG, SREG_I};
use crate::register::RegisterBus;

/// Interrupt vectors serviced by FIRA, in hardware priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vector {
    /// Timer/Counter1 compare match A (vector 11, fault injection).
    Timer1CompA,
    /// Timer/Counter0 compare match A (vector 14, millisecond tick).
    Timer0CompA,
}

impl Vector {
    /// Hardware vector number. Lower numbers win when both are pending.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Timer1CompA => 11,
            Self::Timer0CompA => 14,
        }
    }
}

/// Receiver of interrupts, i.e. the vector table.
///
/// Handlers run with global interrupts masked and must be O(1) and
/// non-blocking. Implementations ignore vectors they do not own.
pub trait InterruptSink {
    /// Service one interrupt.
    fn on_interrupt(&self, vector: Vector);
}

impl<S: InterruptSink + ?Sized> InterruptSink for &S {
    fn on_interrupt(&self, vector: Vector) {
        (**self).on_interrupt(vector);
    }
}

impl<A: InterruptSink, B: InterruptSink> InterruptSink for (A, B) {
    fn on_interrupt(&self, vector: Vector) {
        self.0.on_interrupt(vector);
        self.1.on_interrupt(vector);
    }
}

/// Core-level operations beyond plain register access.
///
/// `halt` and `jump_to_reset` are terminal: on hardware they never return.
/// A host fake records the terminal state and returns, after which every
/// further bus access from the stopped session is ignored.
pub trait Cpu: RegisterBus {
    /// Core clock frequency in Hz.
    fn core_clock_hz(&self) -> u32;

    /// Restart the watchdog countdown (`wdr`).
    fn watchdog_reset(&self);

    /// One iteration of a busy-wait loop.
    fn spin(&self);

    /// Enter a non-terminating loop in the current context.
    fn halt(&self);

    /// Jump to the reset vector without a hardware reset.
    fn jump_to_reset(&self);

    /// Globally enable interrupts (`sei`).
    fn enable_interrupts(&self) {
        self.set_bit(SREG, SREG_I);
    }

    /// Globally disable interrupts (`cli`).
    fn disable_interrupts(&self) {
        self.clear_bit(SREG, SREG_I);
    }

    /// Whether interrupts are globally enabled.
    fn interrupts_enabled(&self) -> bool {
        self.get_bit(SREG, SREG_I)
    }
}

impl<C: Cpu + ?Sized> Cpu for &C {
    fn core_clock_hz(&self) -> u32 {
        (**self).core_clock_hz()
    }

    fn watchdog_reset(&self) {
        (**self).watchdog_reset();
    }

    fn spin(&self) {
        (**self).spin();
    }

    fn halt(&self) {
        (**self).halt();
    }

    fn jump_to_reset(&self) {
        (**self).jump_to_reset();
    }

    fn enable_interrupts(&self) {
        (**self).enable_interrupts();
    }

    fn disable_interrupts(&self) {
        (**self).disable_interrupts();
    }

    fn interrupts_enabled(&self) -> bool {
        (**self).interrupts_enabled()
    }
}
