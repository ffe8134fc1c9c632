//! # fira-systick
//!
//! Monotonic millisecond clock for FIRA.
//!
//! Timer0 runs in CTC mode and raises a compare-match interrupt every
//! millisecond. The handler increments a 32-bit counter and does nothing
//! else. Readers take the counter under a critical section because an 8-bit
//! core loads it one byte at a time.
//!
//! ## Example
//!
//! ```rust
//! use fira_hal::sim::SimBoard;
//! use fira_systick::prelude::*;
//!
//! # fn main() -> Result<(), ClockError> {
//! let board = SimBoard::new();
//! let cpu = board.boot();
//! let clock = SysTick::new(&cpu);
//! cpu.attach(&clock);
//!
//! let config = clock.init()?;
//! assert_eq!(config.compare(), 249);
//!
//! fira_hal::Cpu::enable_interrupts(&cpu);
//! cpu.advance_ms(25);
//! assert_eq!(clock.get_ms(), 25);
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

pub mod clock;
pub mod config;
pub mod error;
pub mod prelude;

pub use clock::{Monotonic, SysTick, interval_elapsed};
pub use config::TickConfig;
pub use error::{ClockError, ClockResult};
