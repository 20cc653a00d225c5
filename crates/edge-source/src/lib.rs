//! Edge Sources
//!
//! Everything between the physical line and the decoder: a monotonic
//! microsecond clock, sources that yield timestamped edges, and the service
//! that binds a source to a [`frame_decoder::DecoderContext`] on its own
//! thread.

mod clock;
mod config;
mod error;
mod replay;
mod service;
mod simulated;

pub use clock::{ManualClock, MonotonicClock, TimestampSource};
pub use config::{open_source, ReplayConfig, SimulatedConfig, SourceConfig};
pub use error::SourceError;
pub use replay::ReplaySource;
pub use service::EdgeService;
pub use simulated::SimulatedTransmitter;

use pulse_protocol::EdgeEvent;
use std::time::Duration;

/// Anything that delivers line transitions
pub trait EdgeSource: Send {
    /// Wait up to `timeout` for the next edge.
    ///
    /// `Ok(None)` means nothing arrived in time; [`SourceError::Closed`]
    /// means the source is finished for good.
    fn next_edge(&mut self, timeout: Duration) -> Result<Option<EdgeEvent>, SourceError>;
}

impl<S: EdgeSource + ?Sized> EdgeSource for Box<S> {
    fn next_edge(&mut self, timeout: Duration) -> Result<Option<EdgeEvent>, SourceError> {
        (**self).next_edge(timeout)
    }
}
