//! Frame Assembler
//!
//! Collects data bits into the receive buffer between SYNC and END_OF_FRAME.

use pulse_protocol::layout::FRAME_CAPACITY;
use pulse_protocol::FrameError;

/// Bit/byte cursors over a fixed receive buffer
#[derive(Debug, Clone)]
pub struct FrameAssembler {
    /// Receive buffer, pre-allocated
    buffer: [u8; FRAME_CAPACITY],
    /// Next bit position within the current byte (0-7, LSB first)
    bit_cursor: u8,
    /// Current byte; equals the capacity once the buffer is full
    byte_cursor: usize,
    /// Set on overrun, cleared by the next SYNC
    overrun: bool,
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAssembler {
    /// Create an assembler with a zeroed buffer
    pub const fn new() -> Self {
        Self {
            buffer: [0; FRAME_CAPACITY],
            bit_cursor: 0,
            byte_cursor: 0,
            overrun: false,
        }
    }

    /// Store one data bit.
    ///
    /// A bit arriving while the buffer is full resets the cursors and
    /// returns [`FrameError::BufferOverrun`] once; later bits are dropped
    /// until the next SYNC.
    pub fn push_bit(&mut self, bit: bool) -> Result<(), FrameError> {
        if self.overrun {
            return Ok(());
        }

        if self.byte_cursor == FRAME_CAPACITY {
            self.overrun = true;
            self.bit_cursor = 0;
            self.byte_cursor = 0;
            return Err(FrameError::BufferOverrun {
                capacity: FRAME_CAPACITY,
            });
        }

        let mask = 1u8 << self.bit_cursor;
        if bit {
            self.buffer[self.byte_cursor] |= mask;
        } else {
            self.buffer[self.byte_cursor] &= !mask;
        }

        self.bit_cursor += 1;
        if self.bit_cursor == 8 {
            self.bit_cursor = 0;
            self.byte_cursor += 1;
        }
        Ok(())
    }

    /// Start of a new frame. Buffer contents are left as they are.
    pub fn sync(&mut self) {
        self.bit_cursor = 0;
        self.byte_cursor = 0;
        self.overrun = false;
    }

    /// Bytes received since the last SYNC, if the frame ended on a byte
    /// boundary
    pub fn end_of_frame(&self) -> Result<&[u8], FrameError> {
        if self.overrun {
            return Err(FrameError::BufferOverrun {
                capacity: FRAME_CAPACITY,
            });
        }
        if self.bit_cursor != 0 {
            return Err(FrameError::Incomplete {
                bit_cursor: self.bit_cursor,
            });
        }
        Ok(&self.buffer[..self.byte_cursor])
    }

    pub fn bit_cursor(&self) -> u8 {
        self.bit_cursor
    }

    pub fn byte_cursor(&self) -> usize {
        self.byte_cursor
    }

    pub fn is_overrun(&self) -> bool {
        self.overrun
    }

    /// Whole receive buffer, including bytes from earlier frames
    pub fn buffer(&self) -> &[u8; FRAME_CAPACITY] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn push_byte(assembler: &mut FrameAssembler, byte: u8) {
        for bit in 0..8 {
            assembler.push_bit(byte & (1 << bit) != 0).unwrap();
        }
    }

    #[test]
    fn test_bits_fill_lsb_first() {
        let mut assembler = FrameAssembler::new();
        assembler.push_bit(true).unwrap();
        assembler.push_bit(false).unwrap();
        assembler.push_bit(true).unwrap();
        assert_eq!(assembler.buffer()[0], 0b101);
        assert_eq!(assembler.bit_cursor(), 3);
        assert_eq!(assembler.byte_cursor(), 0);
    }

    #[test]
    fn test_zero_bit_clears_stale_data() {
        let mut assembler = FrameAssembler::new();
        push_byte(&mut assembler, 0xFF);
        assembler.sync();
        push_byte(&mut assembler, 0x0F);
        assert_eq!(assembler.buffer()[0], 0x0F);
    }

    #[test]
    fn test_byte_boundary_advances_cursor() {
        let mut assembler = FrameAssembler::new();
        push_byte(&mut assembler, 0xA5);
        push_byte(&mut assembler, 0x3C);
        assert_eq!(assembler.bit_cursor(), 0);
        assert_eq!(assembler.byte_cursor(), 2);
        assert_eq!(assembler.end_of_frame().unwrap(), &[0xA5, 0x3C]);
    }

    #[test]
    fn test_end_of_frame_mid_byte() {
        let mut assembler = FrameAssembler::new();
        push_byte(&mut assembler, 0x11);
        for _ in 0..3 {
            assembler.push_bit(true).unwrap();
        }
        assert_eq!(
            assembler.end_of_frame(),
            Err(FrameError::Incomplete { bit_cursor: 3 })
        );
    }

    #[test]
    fn test_sync_keeps_buffer_contents() {
        let mut assembler = FrameAssembler::new();
        push_byte(&mut assembler, 0x42);
        assembler.sync();
        assert_eq!(assembler.byte_cursor(), 0);
        assert_eq!(assembler.buffer()[0], 0x42);
        assert_eq!(assembler.end_of_frame().unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_full_buffer_then_overrun() {
        let mut assembler = FrameAssembler::new();
        for i in 0..FRAME_CAPACITY {
            push_byte(&mut assembler, i as u8);
        }
        assert_eq!(assembler.byte_cursor(), FRAME_CAPACITY);
        assert_eq!(assembler.end_of_frame().unwrap().len(), FRAME_CAPACITY);

        assert_eq!(
            assembler.push_bit(true),
            Err(FrameError::BufferOverrun {
                capacity: FRAME_CAPACITY
            })
        );
        assert!(assembler.is_overrun());
        assert_eq!(assembler.byte_cursor(), 0);

        // Dropped silently until SYNC
        assert_eq!(assembler.push_bit(true), Ok(()));
        assert_eq!(assembler.bit_cursor(), 0);
        assert!(assembler.end_of_frame().is_err());

        assembler.sync();
        assert!(!assembler.is_overrun());
        push_byte(&mut assembler, 0x99);
        assert_eq!(assembler.end_of_frame().unwrap(), &[0x99]);
    }

    proptest! {
        #[test]
        fn prop_sync_always_resets_cursors(bits in proptest::collection::vec(any::<bool>(), 0..600)) {
            let mut assembler = FrameAssembler::new();
            for bit in bits {
                let _ = assembler.push_bit(bit);
            }
            assembler.sync();
            prop_assert_eq!(assembler.bit_cursor(), 0);
            prop_assert_eq!(assembler.byte_cursor(), 0);
            prop_assert!(!assembler.is_overrun());
        }

        #[test]
        fn prop_cursor_stays_in_bounds(bits in proptest::collection::vec(any::<bool>(), 0..1000)) {
            let mut assembler = FrameAssembler::new();
            for bit in bits {
                let _ = assembler.push_bit(bit);
                prop_assert!(assembler.byte_cursor() <= FRAME_CAPACITY);
                prop_assert!(assembler.bit_cursor() < 8);
            }
        }
    }
}
