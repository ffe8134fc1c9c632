//! Persistent record layout. All fields are little-endian.
//!
//! Changing any offset invalidates stored data; the marker check then
//! reinitializes the record on the next boot.

/// Validity marker address (u16).
pub const MAGIC_ADDRESS: u16 = 0;
/// Crash counter address (u16).
pub const CRASH_COUNT_ADDRESS: u16 = 2;
/// Cumulative uptime address (u32, milliseconds).
pub const TOTAL_UPTIME_ADDRESS: u16 = 4;
/// Bytes occupied by the record.
pub const RECORD_LEN: u16 = 8;

/// Marker value of a valid record.
pub const MAGIC: u16 = 0xAA55;
