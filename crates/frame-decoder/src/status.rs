//! Published Decoder Status

use pulse_protocol::DecodedReading;
use serde::{Deserialize, Serialize};
use snapshot_cell::WordPack;

/// Words needed to store a [`Status`] in the snapshot cell
pub const STATUS_WORDS: usize = 9;

/// Frame statistics since start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// END_OF_FRAME symbols seen
    pub frames_total: u32,
    /// Frames dropped for ending mid-byte, being too short or overrunning
    pub frames_incomplete: u32,
    /// Frames dropped for a CRC mismatch
    pub checksum_failures: u32,
    /// Times the receive buffer overflowed
    pub buffer_overruns: u32,
}

impl Counters {
    /// Frames that made it into the reading
    pub fn frames_decoded(&self) -> u32 {
        self.frames_total
            .saturating_sub(self.frames_incomplete)
            .saturating_sub(self.checksum_failures)
    }
}

/// Everything a reader gets in one consistent snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Fields of the last valid frame
    pub reading: DecodedReading,
    /// Running counters
    pub counters: Counters,
    /// Edge timestamp of the last valid frame (µs)
    pub decoded_at_us: Option<u64>,
}

fn pair(high: i16, low: i16) -> u32 {
    (high as u16 as u32) << 16 | low as u16 as u32
}

fn high(word: u32) -> i16 {
    (word >> 16) as u16 as i16
}

fn low(word: u32) -> i16 {
    word as u16 as i16
}

impl WordPack<STATUS_WORDS> for Status {
    fn pack(&self) -> [u32; STATUS_WORDS] {
        let r = &self.reading;
        let c = &self.counters;
        let (has_decoded, decoded_at) = match self.decoded_at_us {
            Some(us) => (1, us),
            None => (0, 0),
        };
        [
            pair(r.boiler_temp_raw, r.solar_temp_raw),
            pair(r.boiler_humidity_raw, r.solar_humidity_raw),
            pair(r.boiler_pressure_raw, has_decoded),
            c.frames_total,
            c.frames_incomplete,
            c.checksum_failures,
            c.buffer_overruns,
            decoded_at as u32,
            (decoded_at >> 32) as u32,
        ]
    }

    fn unpack(w: [u32; STATUS_WORDS]) -> Self {
        let decoded_at = u64::from(w[7]) | u64::from(w[8]) << 32;
        Self {
            reading: DecodedReading {
                boiler_temp_raw: high(w[0]),
                solar_temp_raw: low(w[0]),
                boiler_humidity_raw: high(w[1]),
                solar_humidity_raw: low(w[1]),
                boiler_pressure_raw: high(w[2]),
            },
            counters: Counters {
                frames_total: w[3],
                frames_incomplete: w[4],
                checksum_failures: w[5],
                buffer_overruns: w[6],
            },
            decoded_at_us: (low(w[2]) != 0).then_some(decoded_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pack_preserves_signs_and_large_timestamps() {
        let status = Status {
            reading: DecodedReading {
                boiler_temp_raw: -1,
                solar_temp_raw: i16::MIN,
                boiler_humidity_raw: i16::MAX,
                solar_humidity_raw: 0,
                boiler_pressure_raw: -32_000,
            },
            counters: Counters {
                frames_total: u32::MAX,
                frames_incomplete: 1,
                checksum_failures: 2,
                buffer_overruns: 3,
            },
            decoded_at_us: Some(0x1234_5678_9ABC_DEF0),
        };
        assert_eq!(Status::unpack(status.pack()), status);
    }

    #[test]
    fn test_never_decoded() {
        let status = Status::default();
        assert_eq!(Status::unpack(status.pack()).decoded_at_us, None);

        let at_zero = Status {
            decoded_at_us: Some(0),
            ..Default::default()
        };
        assert_eq!(Status::unpack(at_zero.pack()).decoded_at_us, Some(0));
    }

    #[test]
    fn test_frames_decoded() {
        let counters = Counters {
            frames_total: 10,
            frames_incomplete: 3,
            checksum_failures: 2,
            buffer_overruns: 1,
        };
        assert_eq!(counters.frames_decoded(), 5);
    }

    proptest! {
        #[test]
        fn prop_status_survives_packing(
            fields in any::<[i16; 5]>(),
            counts in any::<[u32; 4]>(),
            decoded_at_us in any::<Option<u64>>(),
        ) {
            let status = Status {
                reading: DecodedReading {
                    boiler_temp_raw: fields[0],
                    solar_temp_raw: fields[1],
                    boiler_humidity_raw: fields[2],
                    solar_humidity_raw: fields[3],
                    boiler_pressure_raw: fields[4],
                },
                counters: Counters {
                    frames_total: counts[0],
                    frames_incomplete: counts[1],
                    checksum_failures: counts[2],
                    buffer_overruns: counts[3],
                },
                decoded_at_us,
            };
            prop_assert_eq!(Status::unpack(status.pack()), status);
        }
    }
}
