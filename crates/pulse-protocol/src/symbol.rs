//! Interval Classification
//!
//! A falling edge starts the pulse timer, the following rising edge stops it.
//! The measured low time selects the symbol.

use crate::edge::{EdgeEvent, Level};
use crate::timing;
use serde::{Deserialize, Serialize};

/// Open interval `(min_us, max_us)` of pulse lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingWindow {
    /// Exclusive lower bound (µs)
    pub min_us: u64,
    /// Exclusive upper bound (µs)
    pub max_us: u64,
}

impl TimingWindow {
    /// Create a new timing window
    pub const fn new(min_us: u64, max_us: u64) -> Self {
        Self { min_us, max_us }
    }

    /// Both bounds are exclusive
    pub const fn contains(&self, interval_us: u64) -> bool {
        interval_us > self.min_us && interval_us < self.max_us
    }

    /// Midpoint of the window, used when transmitting
    pub const fn nominal_us(&self) -> u64 {
        (self.min_us + self.max_us) / 2
    }
}

/// Symbol decoded from one pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// Logic zero
    Zero,
    /// Logic one
    One,
    /// Start of a new frame
    Sync,
    /// End of the current frame
    EndOfFrame,
    /// Pulse outside every window
    Noise,
}

impl Symbol {
    /// Classify a measured pulse length
    pub fn classify(interval_us: u64) -> Self {
        if timing::ZERO_BIT.contains(interval_us) {
            Symbol::Zero
        } else if timing::ONE_BIT.contains(interval_us) {
            Symbol::One
        } else if timing::SYNC.contains(interval_us) {
            Symbol::Sync
        } else if timing::END_OF_FRAME.contains(interval_us) {
            Symbol::EndOfFrame
        } else {
            Symbol::Noise
        }
    }

    /// Symbol carrying a data bit
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Symbol::One
        } else {
            Symbol::Zero
        }
    }

    /// Pulse length a transmitter uses for this symbol, `None` for noise
    pub fn nominal_us(&self) -> Option<u64> {
        match self {
            Symbol::Zero => Some(timing::ZERO_BIT.nominal_us()),
            Symbol::One => Some(timing::ONE_BIT.nominal_us()),
            Symbol::Sync => Some(timing::SYNC.nominal_us()),
            Symbol::EndOfFrame => Some(timing::END_OF_FRAME.nominal_us()),
            Symbol::Noise => None,
        }
    }
}

/// Turns edges into symbols
#[derive(Debug, Clone, Default)]
pub struct IntervalClassifier {
    /// Timestamp of the last falling edge, `None` until the first one
    last_low_us: Option<u64>,
}

impl IntervalClassifier {
    /// Create a classifier with no baseline
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one edge. Falling edges only latch the baseline; a rising edge
    /// yields the symbol for the pulse that just ended.
    pub fn on_edge(&mut self, event: EdgeEvent) -> Option<Symbol> {
        match event.level {
            Level::Low => {
                self.last_low_us = Some(event.timestamp_us);
                None
            }
            Level::High => {
                let start = self.last_low_us?;
                Some(Symbol::classify(event.timestamp_us.saturating_sub(start)))
            }
        }
    }

    /// Timestamp of the last falling edge
    pub fn last_low_us(&self) -> Option<u64> {
        self.last_low_us
    }
}
