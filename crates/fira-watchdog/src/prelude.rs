//! Prelude for fira-watchdog.
//!
//! ```rust
//! use fira_hal::sim::SimBoard;
//! use fira_watchdog::prelude::*;
//!
//! # fn main() -> Result<(), WatchdogError> {
//! let board = SimBoard::new();
//! let cpu = board.boot();
//! let latch = ResetLatch::new();
//! let snapshot = early_boot(&cpu, &latch);
//! assert_eq!(snapshot.kind(), ResetKind::PowerOn);
//!
//! let watchdog = Watchdog::new(&cpu, snapshot);
//! watchdog.init(WatchdogTimeout::S2)?;
//! watchdog.kick();
//! assert!(watchdog.status().is_armed());
//! # Ok(())
//! # }
//! ```

pub use crate::cause::{ResetCause, ResetKind, ResetLatch, ResetSnapshot};
pub use crate::error::{WatchdogError, WatchdogResult};
pub use crate::state::{WatchdogMetrics, WatchdogState, WatchdogStatus};
pub use crate::supervisor::{Watchdog, early_boot};
pub use crate::timeout::WatchdogTimeout;
