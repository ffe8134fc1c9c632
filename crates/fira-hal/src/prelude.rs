//! Prelude for fira-hal.
//!
//! Re-exports the capability traits and the critical-section helpers.

pub use crate::cpu::{Cpu, InterruptSink, Vector};
pub use crate::critical::{self, CriticalSection, InterruptGuard, Shared};
pub use crate::register::{Register, RegisterBus, bit};

#[cfg(target_arch = "avr")]
pub use crate::avr::Atmega328p;
#[cfg(feature = "sim")]
pub use crate::sim::{ResetEvent, ResetSource, SimBoard, SimCpu};
