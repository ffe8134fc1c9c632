//! Prelude for fira-runtime.

pub use crate::config::{ACTIVE_ATTACK, ActiveAttack, RuntimeConfig};
pub use crate::error::{RuntimeError, RuntimeResult};
pub use crate::heartbeat::{Beat, HeartbeatMonitor};
pub use crate::runtime::Runtime;
pub use crate::status::StatusSnapshot;
pub use crate::vectors::Vectors;
