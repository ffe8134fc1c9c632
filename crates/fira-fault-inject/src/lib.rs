//! # fira-fault-inject
//!
//! Periodic fault injection for FIRA.
//!
//! Timer1 runs in CTC mode with a whole-second period. Each compare match
//! increments a 16-bit fault count, raises a one-shot flag, and runs the
//! attack compiled into the firmware:
//!
//! | Mode | Type | Effect |
//! |---|---|---|
//! | A | [`BitFlip`] | invert bit `(n*7) mod 8` of byte `n mod 4` of the victim |
//! | B | [`ControlRedirect`] | jump to the reset vector |
//! | C | [`Hang`] | spin forever with interrupts masked |
//! | - | [`Safe`] | nothing |
//!
//! Modes B and C are terminal for the session. Mode C in particular can only
//! be ended by the watchdog, whose oscillator keeps running while the core
//! is stuck.
//!
//! ## Example
//!
//! ```rust
//! use fira_hal::sim::SimBoard;
//! use fira_fault_inject::prelude::*;
//!
//! # fn main() -> Result<(), FaultConfigError> {
//! let board = SimBoard::new();
//! let cpu = board.boot();
//! let victim = VictimCell::new(0);
//! let injector: FaultInjector<'_, _, BitFlip> = FaultInjector::new(&cpu);
//! cpu.attach(&injector);
//!
//! injector.init(3)?;
//! injector.set_victim(Some(&victim));
//! fira_hal::Cpu::enable_interrupts(&cpu);
//!
//! cpu.advance_ms(3_100);
//! assert_eq!(injector.get_count(), 1);
//! assert!(injector.check_and_clear_flag());
//! assert!(!injector.check_and_clear_flag());
//! assert_eq!(victim.get(&cpu), 1 << 15);
//! # Ok(())
//! # }
//! ```

#![no_std]
#![deny(
    unsafe_code,
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

pub mod attack;
pub mod config;
pub mod error;
pub mod injector;
pub mod prelude;
pub mod victim;

pub use attack::{Attack, AttackMode, BitFlip, ControlRedirect, FaultOutcome, Hang, Safe};
pub use config::FaultTimerConfig;
pub use error::{FaultConfigError, FaultConfigResult};
pub use injector::FaultInjector;
pub use victim::VictimCell;
