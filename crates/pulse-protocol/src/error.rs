//! Frame Error Types

use thiserror::Error;

/// Reasons a received frame is discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// End of frame arrived in the middle of a byte
    #[error("Frame ended mid-byte at bit {bit_cursor}")]
    Incomplete { bit_cursor: u8 },

    /// Not enough bytes for the field layout
    #[error("Frame too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    /// More bits than the receive buffer holds
    #[error("Receive buffer overrun ({capacity} bytes)")]
    BufferOverrun { capacity: usize },

    /// Trailing CRC byte does not match the payload
    #[error("Checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

impl FrameError {
    /// Whether this error is counted as a checksum failure rather than an
    /// incomplete frame
    pub fn is_checksum(&self) -> bool {
        matches!(self, FrameError::ChecksumMismatch { .. })
    }
}
