//! # fira-stats
//!
//! Crash and uptime statistics that survive resets.
//!
//! The record lives at the start of EEPROM (see [`layout`]) behind a
//! validity marker. Every boot that follows an abnormal reset bumps the
//! crash counter, and the main loop periodically folds the session uptime
//! into the stored total. [`availability_percent`] turns both into an
//! availability estimate by charging a fixed recovery cost per crash.
//!
//! ## Example
//!
//! ```rust
//! use core::cell::Cell;
//! use fira_stats::prelude::*;
//! use fira_systick::Monotonic;
//!
//! struct Clock(Cell<u32>);
//! impl Monotonic for Clock {
//!     fn now_ms(&self) -> u32 { self.0.get() }
//! }
//!
//! let clock = Clock(Cell::new(0));
//! let stats = StatsStore::new(RamEeprom::new(), &clock, 2_000);
//! assert_eq!(stats.init(), StatsOrigin::Reinitialized);
//! stats.session_start();
//! stats.record_crash();
//! stats.record_crash();
//! clock.0.set(60_000);
//! assert_eq!(stats.availability(), 93);
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

pub mod availability;
pub mod eeprom;
pub mod error;
pub mod layout;
pub mod prelude;
pub mod store;

pub use availability::availability_percent;
pub use eeprom::{AvrEeprom, Eeprom, RamEeprom};
pub use error::{EepromError, EepromResult};
pub use store::{StatsOrigin, StatsStore};
