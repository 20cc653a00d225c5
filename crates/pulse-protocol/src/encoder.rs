//! Transmitter-side Frame Encoding
//!
//! Produces the waveform a sensor would send. Used by simulated sources and
//! to drive the decoder in tests.

use crate::crc::crc8;
use crate::edge::{EdgeEvent, Level};
use crate::layout::{FRAME_LEN, HEADER_LEN};
use crate::reading::DecodedReading;
use crate::symbol::Symbol;
use crate::timing;

/// Build a complete frame: header, fields, CRC byte
pub fn encode_frame(header: [u8; HEADER_LEN], reading: &DecodedReading) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[..HEADER_LEN].copy_from_slice(&header);
    reading.write_fields(&mut frame);
    frame[FRAME_LEN - 1] = crc8(&frame[..FRAME_LEN - 1]);
    frame
}

/// Expands bytes into symbols and symbols into edges
#[derive(Debug, Clone)]
pub struct PulseEncoder {
    /// High time between pulses (µs)
    gap_us: u64,
}

impl Default for PulseEncoder {
    fn default() -> Self {
        Self {
            gap_us: timing::SYMBOL_GAP_US,
        }
    }
}

impl PulseEncoder {
    /// Create an encoder with a custom inter-pulse gap
    pub fn with_gap(gap_us: u64) -> Self {
        Self { gap_us }
    }

    /// Symbol stream for one frame: SYNC, data bits LSB first, END_OF_FRAME
    pub fn symbols(&self, bytes: &[u8]) -> Vec<Symbol> {
        let mut symbols = Vec::with_capacity(bytes.len() * 8 + 2);
        symbols.push(Symbol::Sync);
        for &byte in bytes {
            for bit in 0..8 {
                symbols.push(Symbol::from_bit(byte & (1 << bit) != 0));
            }
        }
        symbols.push(Symbol::EndOfFrame);
        symbols
    }

    /// Edge pairs for a symbol stream starting at `start_us`. Noise symbols
    /// have no nominal length and are skipped.
    pub fn edges(&self, symbols: &[Symbol], start_us: u64) -> Vec<EdgeEvent> {
        let mut edges = Vec::with_capacity(symbols.len() * 2);
        let mut now = start_us;
        for symbol in symbols {
            let Some(duration) = symbol.nominal_us() else {
                continue;
            };
            edges.push(EdgeEvent::new(now, Level::Low));
            edges.push(EdgeEvent::new(now + duration, Level::High));
            now += duration + self.gap_us;
        }
        edges
    }

    /// Edges for a whole frame
    pub fn encode(&self, bytes: &[u8], start_us: u64) -> Vec<EdgeEvent> {
        self.edges(&self.symbols(bytes), start_us)
    }

    /// Air time of a frame (µs), including the trailing gap
    pub fn frame_duration_us(&self, bytes: &[u8]) -> u64 {
        self.symbols(bytes)
            .iter()
            .filter_map(Symbol::nominal_us)
            .map(|d| d + self.gap_us)
            .sum()
    }
}
