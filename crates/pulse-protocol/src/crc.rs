//! Frame Checksum
//!
//! Bit-serial LFSR with feedback taps 0x18 (x^8 + x^5 + x^4 + 1), data fed
//! LSB first. Produces the same values as CRC-8/MAXIM.

use crate::error::FrameError;
use crate::layout::MIN_FRAME_LEN;

/// Feedback taps applied before the shift
const FEEDBACK: u8 = 0x18;

/// Compute the checksum of a payload
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for &byte in data {
        let mut data = byte;
        for _ in 0..8 {
            let feedback = (crc ^ data) & 0x01;
            if feedback == 0x01 {
                crc ^= FEEDBACK;
            }
            crc = (crc >> 1) & 0x7F;
            if feedback == 0x01 {
                crc |= 0x80;
            }
            data >>= 1;
        }
    }
    crc
}

/// Check a received frame (payload followed by its CRC byte) and return the
/// payload
pub fn verify_frame(frame: &[u8]) -> Result<&[u8], FrameError> {
    if frame.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort {
            len: frame.len(),
            min: MIN_FRAME_LEN,
        });
    }

    let (payload, trailer) = frame.split_at(frame.len() - 1);
    let calculated = crc8(payload);
    if calculated != trailer[0] {
        return Err(FrameError::ChecksumMismatch {
            expected: trailer[0],
            actual: calculated,
        });
    }
    Ok(payload)
}
