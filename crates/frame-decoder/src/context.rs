//! Decoder Context
//!
//! Owns the whole receive pipeline for one sensor line. The edge handler
//! drives it through `&mut self`; other threads observe it through
//! [`StatusReader`].

use crate::assembler::FrameAssembler;
use crate::status::{Counters, Status, STATUS_WORDS};
use pulse_protocol::{verify_frame, DecodedReading, EdgeEvent, IntervalClassifier, Level, Symbol};
use snapshot_cell::{Publisher, Reader};
use tracing::{debug, warn};

/// Edge-driven decoder for one sensor line
pub struct DecoderContext {
    /// Edge → symbol
    classifier: IntervalClassifier,
    /// Symbol → frame bytes
    assembler: FrameAssembler,
    /// Writer-side copy of the published status
    status: Status,
    /// Single publish point for readers
    publisher: Publisher<Status, STATUS_WORDS>,
}

impl Default for DecoderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl DecoderContext {
    /// Create a decoder with zeroed state
    pub fn new() -> Self {
        let status = Status::default();
        let (publisher, _) = snapshot_cell::channel(status);
        Self {
            classifier: IntervalClassifier::new(),
            assembler: FrameAssembler::new(),
            status,
            publisher,
        }
    }

    /// Handle one line transition. O(1) and never blocks; allocation-free
    /// unless a subscriber is recording the `warn!` events for dropped frames.
    pub fn on_edge(&mut self, timestamp_us: u64, level: Level) {
        self.on_event(EdgeEvent::new(timestamp_us, level));
    }

    /// Handle one line transition
    pub fn on_event(&mut self, event: EdgeEvent) {
        if let Some(symbol) = self.classifier.on_edge(event) {
            self.on_symbol(symbol, event.timestamp_us);
        }
    }

    /// Apply an already classified symbol
    pub fn on_symbol(&mut self, symbol: Symbol, timestamp_us: u64) {
        match symbol {
            Symbol::Zero | Symbol::One => {
                if let Err(err) = self.assembler.push_bit(symbol == Symbol::One) {
                    warn!("Dropping frame: {}", err);
                    self.status.counters.buffer_overruns =
                        self.status.counters.buffer_overruns.saturating_add(1);
                    self.publisher.publish(&self.status);
                }
            }
            Symbol::Sync => self.assembler.sync(),
            Symbol::EndOfFrame => self.finish_frame(timestamp_us),
            Symbol::Noise => {}
        }
    }

    /// Validate and interpret the frame that just ended, then publish
    fn finish_frame(&mut self, timestamp_us: u64) {
        let counters = &mut self.status.counters;
        counters.frames_total = counters.frames_total.saturating_add(1);

        let decoded = self.assembler.end_of_frame().and_then(|frame| {
            verify_frame(frame)?;
            DecodedReading::from_frame(frame)
        });

        match decoded {
            Ok(reading) => {
                debug!(
                    "Frame decoded: boiler {} °C, solar {} °C",
                    reading.boiler_temp(),
                    reading.solar_temp()
                );
                self.status.reading = reading;
                self.status.decoded_at_us = Some(timestamp_us);
            }
            Err(err) if err.is_checksum() => {
                warn!("Discarding frame: {}", err);
                counters.checksum_failures = counters.checksum_failures.saturating_add(1);
            }
            Err(err) => {
                debug!("Discarding frame: {}", err);
                counters.frames_incomplete = counters.frames_incomplete.saturating_add(1);
            }
        }

        self.publisher.publish(&self.status);
    }

    /// Latest reading and counters
    pub fn snapshot(&self) -> (DecodedReading, Counters) {
        (self.status.reading, self.status.counters)
    }

    /// Latest full status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Handle for observing this decoder from other threads
    pub fn reader(&self) -> StatusReader {
        StatusReader {
            inner: self.publisher.reader(),
        }
    }

    /// Receive-side state, for diagnostics
    pub fn assembler(&self) -> &FrameAssembler {
        &self.assembler
    }
}

/// Read-only view of a [`DecoderContext`], shareable across threads
#[derive(Clone)]
pub struct StatusReader {
    inner: Reader<Status, STATUS_WORDS>,
}

impl StatusReader {
    /// Latest reading and counters, never torn
    pub fn snapshot(&self) -> (DecodedReading, Counters) {
        let status = self.inner.load();
        (status.reading, status.counters)
    }

    /// Latest full status
    pub fn status(&self) -> Status {
        self.inner.load()
    }

    /// Number of status updates published so far
    pub fn version(&self) -> usize {
        self.inner.version()
    }
}
