//! # fira-watchdog
//!
//! Watchdog supervisor for FIRA.
//!
//! The AVR watchdog runs from its own 128 kHz oscillator, so it keeps
//! counting when the core is stuck with interrupts masked. That makes it the
//! recovery mechanism for every injected fault: the main loop kicks it, and
//! if the main loop stops making progress the watchdog resets the core.
//!
//! ## Boot sequence
//!
//! 1. [`early_boot`] latches `MCUSR` into a [`ResetSnapshot`], clears it and
//!    disables the watchdog (a watchdog reset leaves it running at 16 ms).
//! 2. [`Watchdog::init`] arms the chosen [`WatchdogTimeout`] using the timed
//!    `WDCE` sequence and verifies it by read-back.
//! 3. The main loop calls [`Watchdog::kick`] on every iteration.
//!
//! ## State Machine
//!
//! ```text
//! Uninitialized ──init()──► Armed(timeout) ◄──init()──┐
//!       │                       │    │                │
//!       └──────disable()────────┼────┘                │
//!                               ▼                     │
//!                           Disabled ─────────────────┘
//! ```
//!
//! Hangs are never suppressed: a missed kick always ends in a reset.

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

pub mod cause;
pub mod error;
pub mod prelude;
pub mod state;
pub mod supervisor;
pub mod timeout;

pub use cause::{ResetCause, ResetKind, ResetLatch, ResetSnapshot};
pub use error::{WatchdogError, WatchdogResult};
pub use state::{WatchdogMetrics, WatchdogState, WatchdogStatus};
pub use supervisor::{Watchdog, early_boot};
pub use timeout::WatchdogTimeout;
