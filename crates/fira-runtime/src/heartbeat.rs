//! Victim counter heartbeat and corruption detection.
//!
//! Each heartbeat increments the victim counter by one. Any other step
//! between consecutive beats means something else wrote the counter, which
//! in this firmware is the bit-flip attack. Corruption is reported, never
//! repaired: the monitor re-bases on whatever value it observed.

/// Result of one heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Beat {
    /// The counter advanced by exactly one.
    Steady {
        /// Counter after the increment.
        counter: u32,
    },
    /// The counter moved by something other than one.
    Corrupted {
        /// Counter after the increment.
        counter: u32,
        /// Deviation from the expected value, wrapping, as a signed offset.
        delta: i32,
        /// Whether a fault interrupt ran since the previous beat.
        fault_injected: bool,
    },
}

impl Beat {
    /// Counter after the increment.
    #[must_use]
    pub const fn counter(self) -> u32 {
        match self {
            Self::Steady { counter } | Self::Corrupted { counter, .. } => counter,
        }
    }

    /// Whether corruption was detected.
    #[must_use]
    pub const fn is_corrupted(self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }
}

/// Expected-value tracker for the heartbeat counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatMonitor {
    last: u32,
    beats: u32,
    corruptions: u32,
}

impl HeartbeatMonitor {
    /// Start tracking from the counter's current value.
    #[must_use]
    pub const fn new(initial: u32) -> Self {
        Self {
            last: initial,
            beats: 0,
            corruptions: 0,
        }
    }

    /// Check the counter value produced by one heartbeat increment.
    pub fn observe(&mut self, counter: u32, fault_injected: bool) -> Beat {
        let expected = self.last.wrapping_add(1);
        self.last = counter;
        self.beats = self.beats.wrapping_add(1);
        if counter == expected {
            return Beat::Steady { counter };
        }

        let delta = counter.wrapping_sub(expected).cast_signed();
        self.corruptions = self.corruptions.wrapping_add(1);
        tracing::warn!(counter, delta, fault_injected, "victim counter corruption detected");
        Beat::Corrupted {
            counter,
            delta,
            fault_injected,
        }
    }

    /// Last observed counter value.
    #[must_use]
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// Heartbeats observed.
    #[must_use]
    pub const fn beats(&self) -> u32 {
        self.beats
    }

    /// Heartbeats that detected corruption.
    #[must_use]
    pub const fn corruptions(&self) -> u32 {
        self.corruptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_counter() {
        let mut monitor = HeartbeatMonitor::new(0);
        for counter in 1..=5 {
            assert_eq!(monitor.observe(counter, false), Beat::Steady { counter });
        }
        assert_eq!(monitor.beats(), 5);
        assert_eq!(monitor.corruptions(), 0);
    }

    #[test]
    fn test_counter_wraps_without_corruption() {
        let mut monitor = HeartbeatMonitor::new(u32::MAX);
        assert!(!monitor.observe(0, false).is_corrupted());
    }

    #[test]
    fn test_high_bit_flip_reports_signed_delta() {
        let mut monitor = HeartbeatMonitor::new(10);
        // Bit 15 set between beats.
        let beat = monitor.observe(11 | 1 << 15, true);
        assert_eq!(
            beat,
            Beat::Corrupted {
                counter: 11 | 1 << 15,
                delta: 1 << 15,
                fault_injected: true
            }
        );

        // Bit 31 cleared between beats: a large negative jump.
        let mut monitor = HeartbeatMonitor::new(0x8000_0000);
        let beat = monitor.observe(2, true);
        assert!(matches!(beat, Beat::Corrupted { delta, .. } if delta == i32::MIN + 1));
    }

    #[test]
    fn test_corruption_rebases_on_observed_value() {
        let mut monitor = HeartbeatMonitor::new(0);
        assert!(monitor.observe(100, true).is_corrupted());
        assert_eq!(monitor.last(), 100);
        assert!(!monitor.observe(101, false).is_corrupted());
        assert_eq!(monitor.corruptions(), 1);
    }

    #[test]
    fn test_low_bit_flip_is_reported() {
        let mut monitor = HeartbeatMonitor::new(4);
        let beat = monitor.observe(4, true);
        assert!(matches!(beat, Beat::Corrupted { delta: -1, .. }));
    }
}
