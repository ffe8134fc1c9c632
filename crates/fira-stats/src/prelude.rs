//! Prelude for fira-stats.

pub use crate::availability::availability_percent;
pub use crate::eeprom::{AvrEeprom, Eeprom, RamEeprom};
pub use crate::error::{EepromError, EepromResult};
pub use crate::store::{StatsOrigin, StatsStore};
