//! RNTS Pulse Protocol
//!
//! The sensor transmits each bit as the length of a low pulse on a single
//! line. This crate holds the protocol itself: interval classification,
//! the CRC-8 frame check, the frame layout and a transmitter-side encoder.
//! It keeps no shared state; the stateful decoder lives in `frame-decoder`.

mod crc;
mod edge;
mod encoder;
mod error;
mod reading;
mod symbol;

pub use crc::{crc8, verify_frame};
pub use edge::{EdgeEvent, Level};
pub use encoder::{encode_frame, PulseEncoder};
pub use error::FrameError;
pub use reading::{DecodedReading, Tenths};
pub use symbol::{IntervalClassifier, Symbol, TimingWindow};

/// Frame layout constants
pub mod layout {
    /// Bytes preceding the first field (sensor address and flags)
    pub const HEADER_LEN: usize = 4;
    /// Boiler temperature, tenths of °C
    pub const BOILER_TEMP: usize = 4;
    /// Solar temperature, tenths of °C
    pub const SOLAR_TEMP: usize = 6;
    /// Boiler relative humidity, tenths of %
    pub const BOILER_HUMIDITY: usize = 8;
    /// Solar relative humidity, tenths of %
    pub const SOLAR_HUMIDITY: usize = 10;
    /// Boiler pressure, tenths of hPa
    pub const BOILER_PRESSURE: usize = 12;
    /// Shortest frame the interpreter can read all fields from
    pub const MIN_FRAME_LEN: usize = 14;
    /// Length of a frame as sent by the transmitter (fields + CRC byte)
    pub const FRAME_LEN: usize = 15;
    /// Receive buffer capacity
    pub const FRAME_CAPACITY: usize = 50;
}

/// Pulse timing constants (microseconds)
pub mod timing {
    use crate::symbol::TimingWindow;

    /// Logic zero
    pub const ZERO_BIT: TimingWindow = TimingWindow::new(200, 400);
    /// Logic one
    pub const ONE_BIT: TimingWindow = TimingWindow::new(500, 700);
    /// Frame start, resets the cursors
    pub const SYNC: TimingWindow = TimingWindow::new(1900, 2100);
    /// Frame end, triggers validation
    pub const END_OF_FRAME: TimingWindow = TimingWindow::new(2900, 3100);
    /// Idle time between the end of one pulse and the start of the next
    pub const SYMBOL_GAP_US: u64 = 250;
}
