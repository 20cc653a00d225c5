//! Capture Replay
//!
//! Reads edges recorded from a real line. One edge per line:
//! `<timestamp_us> <level>` with level `0` (low) or `1` (high). Blank lines
//! and `#` comments are skipped.

use crate::error::SourceError;
use crate::EdgeSource;
use pulse_protocol::{EdgeEvent, Level};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Edge source backed by a recorded capture
pub struct ReplaySource {
    edges: VecDeque<EdgeEvent>,
    /// Pace edges by their recorded spacing instead of all at once
    realtime: bool,
    /// Wall time and capture time of the first replayed edge
    anchor: Option<(Instant, u64)>,
}

impl ReplaySource {
    /// Load a capture file
    pub fn open(path: impl AsRef<Path>, realtime: bool) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let source = Self::from_reader(BufReader::new(file), realtime)?;
        info!("Loaded {} edges from {}", source.remaining(), path.display());
        Ok(source)
    }

    /// Parse a capture from any reader
    pub fn from_reader(reader: impl BufRead, realtime: bool) -> Result<Self, SourceError> {
        let mut edges = VecDeque::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if let Some(edge) = parse_line(&line, index + 1)? {
                edges.push_back(edge);
            }
        }
        Ok(Self {
            edges,
            realtime,
            anchor: None,
        })
    }

    /// Edges not yet delivered
    pub fn remaining(&self) -> usize {
        self.edges.len()
    }

    /// How long until `edge` is due, in realtime mode
    fn delay_for(&mut self, edge: &EdgeEvent) -> Duration {
        let (started, first_us) = *self
            .anchor
            .get_or_insert_with(|| (Instant::now(), edge.timestamp_us));
        let due = Duration::from_micros(edge.timestamp_us.saturating_sub(first_us));
        due.saturating_sub(started.elapsed())
    }
}

fn parse_line(line: &str, number: usize) -> Result<Option<EdgeEvent>, SourceError> {
    let content = line.split('#').next().unwrap_or("").trim();
    if content.is_empty() {
        return Ok(None);
    }

    let parse_error = |reason: &str| SourceError::Parse {
        line: number,
        reason: reason.to_string(),
    };

    let mut parts = content.split_whitespace();
    let timestamp_us = parts
        .next()
        .and_then(|t| t.parse::<u64>().ok())
        .ok_or_else(|| parse_error("invalid timestamp"))?;
    let level = parts
        .next()
        .and_then(|l| l.parse::<u8>().ok())
        .filter(|raw| *raw <= 1)
        .map(Level::from_raw)
        .ok_or_else(|| parse_error("level must be 0 or 1"))?;
    if parts.next().is_some() {
        return Err(parse_error("trailing data"));
    }

    Ok(Some(EdgeEvent::new(timestamp_us, level)))
}

impl EdgeSource for ReplaySource {
    fn next_edge(&mut self, timeout: Duration) -> Result<Option<EdgeEvent>, SourceError> {
        let Some(edge) = self.edges.front().copied() else {
            return Err(SourceError::Closed);
        };

        if self.realtime {
            let delay = self.delay_for(&edge);
            if delay > timeout {
                thread::sleep(timeout);
                return Ok(None);
            }
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        self.edges.pop_front();
        Ok(Some(edge))
    }
}
