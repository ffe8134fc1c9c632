//! # fira-runtime
//!
//! Boot and main-loop composition for FIRA.
//!
//! [`Runtime::boot`] brings the system up in a fixed order:
//!
//! 1. latch the reset cause and disarm the watchdog,
//! 2. load the statistics record, counting a crash after a watchdog reset,
//! 3. start the millisecond clock,
//! 4. start the fault timer and register the victim counter,
//! 5. arm the watchdog,
//! 6. enable interrupts and start the session.
//!
//! [`Runtime::poll`] is the main loop body. It advances the heartbeat,
//! checks the victim counter for corruption, flushes uptime and takes a
//! status snapshot on their intervals, then kicks the watchdog. Whatever the
//! attack does to the foreground, the watchdog brings the board back.
//!
//! Timing comes from [`config`]; the attack is chosen at build time with an
//! `attack-*` feature.
//!
//! ## Example
//!
//! ```rust
//! use fira_fault_inject::{Safe, VictimCell};
//! use fira_hal::sim::SimBoard;
//! use fira_runtime::prelude::*;
//! use fira_watchdog::ResetLatch;
//!
//! # fn main() -> Result<(), RuntimeError> {
//! let board = SimBoard::new();
//! let victim = VictimCell::new(0);
//! let cpu = board.boot();
//! let vectors = Vectors::<_, Safe>::new(&cpu);
//! cpu.attach(&vectors);
//!
//! let mut runtime = Runtime::boot(&cpu, &vectors, &victim, &ResetLatch::new(), RuntimeConfig::DEFAULT)?;
//! assert!(cpu.run(1_050, || { runtime.poll(); }).is_none());
//! assert_eq!(runtime.status().counter, 10);
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

pub mod config;
pub mod error;
pub mod heartbeat;
pub mod prelude;
pub mod runtime;
pub mod status;
pub mod vectors;

pub use config::{ACTIVE_ATTACK, ActiveAttack, RuntimeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use heartbeat::{Beat, HeartbeatMonitor};
pub use runtime::Runtime;
pub use status::StatusSnapshot;
pub use vectors::Vectors;
