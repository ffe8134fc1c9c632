//! Prelude for fira-fault-inject.

pub use crate::attack::{
    Attack, AttackMode, BitFlip, ControlRedirect, FaultOutcome, Hang, Safe, apply_bit_flip,
    bit_flip_target,
};
pub use crate::config::{FaultTimerConfig, max_interval_seconds};
pub use crate::error::{FaultConfigError, FaultConfigResult};
pub use crate::injector::FaultInjector;
pub use crate::victim::VictimCell;
