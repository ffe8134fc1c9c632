//! Prelude for fira-systick.

pub use crate::clock::{Monotonic, SysTick, interval_elapsed};
pub use crate::config::TickConfig;
pub use crate::error::{ClockError, ClockResult};
