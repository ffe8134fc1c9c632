//! Availability estimate from uptime and crash count.

/// Percentage of time the system was up, in `0..=100`.
///
/// Each crash is charged `recovery_cost_ms` of downtime. With no crashes,
/// no uptime or a zero recovery cost the result is 100. The arithmetic is
/// widened so large uptimes never overflow.
#[must_use]
pub fn availability_percent(uptime_ms: u64, crashes: u16, recovery_cost_ms: u32) -> u8 {
    if crashes == 0 || uptime_ms == 0 || recovery_cost_ms == 0 {
        return 100;
    }
    let uptime = u128::from(uptime_ms);
    let downtime = u128::from(crashes) * u128::from(recovery_cost_ms);
    u8::try_from(uptime * 100 / (uptime + downtime)).unwrap_or(100)
}
