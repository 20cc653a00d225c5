//! Edge Source Configuration

use crate::clock::MonotonicClock;
use crate::error::SourceError;
use crate::replay::ReplaySource;
use crate::simulated::SimulatedTransmitter;
use crate::EdgeSource;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Which edge source to run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Built-in transmitter simulation
    Simulated(SimulatedConfig),
    /// Recorded capture file
    Replay(ReplayConfig),
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Simulated(SimulatedConfig::default())
    }
}

/// Simulated transmitter settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedConfig {
    /// Time between frame starts (milliseconds)
    pub frame_interval_ms: u64,
    /// Corrupt every Nth frame's payload to exercise CRC handling
    pub corrupt_every: Option<u32>,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 2000,
            corrupt_every: None,
        }
    }
}

/// Capture replay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Capture file path
    pub path: PathBuf,
    /// Pace edges by their recorded timestamps
    #[serde(default = "default_realtime")]
    pub realtime: bool,
}

fn default_realtime() -> bool {
    true
}

/// Build the configured source
pub fn open_source(config: &SourceConfig) -> Result<Box<dyn EdgeSource>, SourceError> {
    match config {
        SourceConfig::Simulated(simulated) => {
            info!(
                "Using simulated transmitter, one frame every {} ms",
                simulated.frame_interval_ms
            );
            Ok(Box::new(SimulatedTransmitter::new(
                MonotonicClock::new(),
                simulated.clone(),
            )))
        }
        SourceConfig::Replay(replay) => {
            info!("Replaying capture {}", replay.path.display());
            Ok(Box::new(ReplaySource::open(&replay.path, replay.realtime)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_simulated() {
        assert_eq!(
            SourceConfig::default(),
            SourceConfig::Simulated(SimulatedConfig {
                frame_interval_ms: 2000,
                corrupt_every: None,
            })
        );
    }

    #[test]
    fn test_missing_capture_file() {
        let config = SourceConfig::Replay(ReplayConfig {
            path: PathBuf::from("/nonexistent/capture.txt"),
            realtime: false,
        });
        assert!(matches!(open_source(&config), Err(SourceError::Io(_))));
    }

    #[test]
    fn test_open_simulated() {
        assert!(open_source(&SourceConfig::default()).is_ok());
    }
}
