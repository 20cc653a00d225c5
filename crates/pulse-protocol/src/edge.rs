//! Edge Events

use serde::{Deserialize, Serialize};

/// Line level after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Line idle / pulse ended
    High,
    /// Pulse in progress
    Low,
}

impl Level {
    /// Level from a raw GPIO read (0 = low, anything else = high)
    pub fn from_raw(value: u8) -> Self {
        if value == 0 {
            Level::Low
        } else {
            Level::High
        }
    }
}

/// A single transition of the monitored line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEvent {
    /// Monotonic timestamp of the transition (µs)
    pub timestamp_us: u64,
    /// Level the line settled at
    pub level: Level,
}

impl EdgeEvent {
    /// Create a new edge event
    pub fn new(timestamp_us: u64, level: Level) -> Self {
        Self {
            timestamp_us,
            level,
        }
    }
}
