//! Decoded Sensor Readings

use crate::error::FrameError;
use crate::layout;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw field values of the last valid frame, in tenths of a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedReading {
    /// Boiler temperature (°C * 10)
    pub boiler_temp_raw: i16,
    /// Solar collector temperature (°C * 10)
    pub solar_temp_raw: i16,
    /// Boiler relative humidity (% * 10)
    pub boiler_humidity_raw: i16,
    /// Solar relative humidity (% * 10)
    pub solar_humidity_raw: i16,
    /// Boiler pressure (hPa * 10)
    pub boiler_pressure_raw: i16,
}

impl DecodedReading {
    /// Extract the fields from a received frame. Offsets are fixed from the
    /// start of the frame; on a minimum-length frame the last field shares
    /// its low byte with the CRC.
    pub fn from_frame(frame: &[u8]) -> Result<Self, FrameError> {
        if frame.len() < layout::MIN_FRAME_LEN {
            return Err(FrameError::TooShort {
                len: frame.len(),
                min: layout::MIN_FRAME_LEN,
            });
        }

        Ok(Self {
            boiler_temp_raw: read_i16(frame, layout::BOILER_TEMP),
            solar_temp_raw: read_i16(frame, layout::SOLAR_TEMP),
            boiler_humidity_raw: read_i16(frame, layout::BOILER_HUMIDITY),
            solar_humidity_raw: read_i16(frame, layout::SOLAR_HUMIDITY),
            boiler_pressure_raw: read_i16(frame, layout::BOILER_PRESSURE),
        })
    }

    /// Write the fields into a frame buffer at their layout offsets
    pub fn write_fields(&self, frame: &mut [u8; layout::FRAME_LEN]) {
        let fields = [
            (layout::BOILER_TEMP, self.boiler_temp_raw),
            (layout::SOLAR_TEMP, self.solar_temp_raw),
            (layout::BOILER_HUMIDITY, self.boiler_humidity_raw),
            (layout::SOLAR_HUMIDITY, self.solar_humidity_raw),
            (layout::BOILER_PRESSURE, self.boiler_pressure_raw),
        ];
        for (offset, value) in fields {
            frame[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
        }
    }

    /// Boiler temperature (°C)
    pub fn boiler_temp(&self) -> Tenths {
        Tenths(self.boiler_temp_raw)
    }

    /// Solar temperature (°C)
    pub fn solar_temp(&self) -> Tenths {
        Tenths(self.solar_temp_raw)
    }

    /// Boiler humidity (%)
    pub fn boiler_humidity(&self) -> Tenths {
        Tenths(self.boiler_humidity_raw)
    }

    /// Solar humidity (%)
    pub fn solar_humidity(&self) -> Tenths {
        Tenths(self.solar_humidity_raw)
    }

    /// Boiler pressure (hPa)
    pub fn boiler_pressure(&self) -> Tenths {
        Tenths(self.boiler_pressure_raw)
    }
}

fn read_i16(frame: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([frame[offset], frame[offset + 1]])
}

/// Fixed-point value with one decimal digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tenths(pub i16);

impl Tenths {
    /// Value as a float
    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Tenths {
    /// The sign belongs to the whole value, so -5 renders as `-0.5`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = i32::from(self.0);
        let sign = if raw < 0 { "-" } else { "" };
        let abs = raw.abs();
        write!(f, "{}{}.{}", sign, abs / 10, abs % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_big_endian() {
        // 00D7 = 215, FFCB = -53, 01C8 = 456, 0264 = 612, 2794 = 10132
        let frame = [
            0xA5, 0x01, 0x02, 0x03, 0x00, 0xD7, 0xFF, 0xCB, 0x01, 0xC8, 0x02, 0x64, 0x27, 0x94,
            0xC6,
        ];
        let reading = DecodedReading::from_frame(&frame).unwrap();
        assert_eq!(reading.boiler_temp_raw, 215);
        assert_eq!(reading.solar_temp_raw, -53);
        assert_eq!(reading.boiler_humidity_raw, 456);
        assert_eq!(reading.solar_humidity_raw, 612);
        assert_eq!(reading.boiler_pressure_raw, 10132);
    }

    #[test]
    fn test_write_fields_matches_layout() {
        let reading = DecodedReading {
            boiler_temp_raw: -1,
            solar_temp_raw: i16::MIN,
            boiler_humidity_raw: i16::MAX,
            solar_humidity_raw: 0x1234,
            boiler_pressure_raw: 9876,
        };
        let mut frame = [0u8; layout::FRAME_LEN];
        reading.write_fields(&mut frame);
        assert_eq!(&frame[4..8], &[0xFF, 0xFF, 0x80, 0x00]);
        assert_eq!(DecodedReading::from_frame(&frame).unwrap(), reading);
    }

    #[test]
    fn test_write_fields_leaves_header_and_crc() {
        let mut frame = [0xEEu8; layout::FRAME_LEN];
        DecodedReading::default().write_fields(&mut frame);
        assert_eq!(&frame[..layout::HEADER_LEN], &[0xEE; 4]);
        assert_eq!(&frame[layout::HEADER_LEN..layout::FRAME_LEN - 1], &[0u8; 10]);
        assert_eq!(frame[layout::FRAME_LEN - 1], 0xEE);
    }

    #[test]
    fn test_short_frame() {
        assert_eq!(
            DecodedReading::from_frame(&[0u8; 13]),
            Err(FrameError::TooShort { len: 13, min: 14 })
        );
    }

    #[test]
    fn test_tenths_display() {
        assert_eq!(Tenths(215).to_string(), "21.5");
        assert_eq!(Tenths(0).to_string(), "0.0");
        assert_eq!(Tenths(-5).to_string(), "-0.5");
        assert_eq!(Tenths(-53).to_string(), "-5.3");
        assert_eq!(Tenths(10132).to_string(), "1013.2");
        assert_eq!(Tenths(i16::MIN).to_string(), "-3276.8");
    }

    #[test]
    fn test_tenths_as_f64() {
        assert!((Tenths(-53).as_f64() + 5.3).abs() < 1e-9);
    }
}
