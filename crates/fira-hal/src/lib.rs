//! # fira-hal
//!
//! Register-level capability layer for FIRA on the ATmega328P.
//!
//! Every other FIRA crate talks to hardware through two narrow traits:
//! - [`RegisterBus`]: 8-bit memory-mapped register reads and writes
//! - [`Cpu`]: core clock, `wdr`, busy-wait, halt, jump to reset, and the
//!   global interrupt flag
//!
//! On the target, [`avr::Atmega328p`] implements both with volatile MMIO and
//! inline assembly. On the host, [`sim::SimBoard`] provides a cycle-counted
//! simulation of the peripherals FIRA uses (Timer0, Timer1, watchdog,
//! EEPROM, reset flags) so that every component can be exercised by tests.
//!
//! ## Critical sections
//!
//! State shared with interrupt handlers is held in [`Shared`] and accessed
//! through [`critical::free`], which masks interrupts by saving and
//! restoring `SREG`.
//!
//! ## Example
//!
//! ```rust
//! use fira_hal::prelude::*;
//! use fira_hal::atmega328p::OCR0A;
//!
//! let board = SimBoard::new();
//! let cpu = board.boot();
//!
//! cpu.write(OCR0A, 249);
//! assert_eq!(cpu.read(OCR0A), 249);
//!
//! let counter = Shared::new(0_u32);
//! critical::free(&cpu, |cs| counter.update(cs, |n| n + 1));
//! assert_eq!(critical::free(&cpu, |cs| counter.get(cs)), 1);
//! ```

#![no_std]
#![cfg_attr(target_arch = "avr", feature(asm_experimental_arch))]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

pub mod atmega328p;
#[cfg(target_arch = "avr")]
pub mod avr;
pub mod cpu;
pub mod critical;
pub mod prelude;
pub mod register;
#[cfg(feature = "sim")]
pub mod sim;

pub use cpu::{Cpu, InterruptSink, Vector};
pub use critical::{CriticalSection, InterruptGuard, Shared};
pub use register::{Register, RegisterBus, bit};
