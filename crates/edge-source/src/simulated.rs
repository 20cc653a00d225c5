//! Simulated Sensor Transmitter
//!
//! Emits the waveform of a sensor sending a frame at a fixed interval, for
//! running the full pipeline without hardware.

use crate::clock::TimestampSource;
use crate::config::SimulatedConfig;
use crate::error::SourceError;
use crate::EdgeSource;
use pulse_protocol::{encode_frame, layout, DecodedReading, EdgeEvent, PulseEncoder};
use std::collections::hash_map::DefaultHasher;
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Header bytes carried by simulated frames
pub const SIMULATED_HEADER: [u8; layout::HEADER_LEN] = *b"RNTS";

/// Pulse train generator driven by a clock
pub struct SimulatedTransmitter<C> {
    clock: C,
    config: SimulatedConfig,
    encoder: PulseEncoder,
    /// Edges of the frame being sent
    pending: VecDeque<EdgeEvent>,
    /// When the next frame starts (µs)
    next_frame_us: u64,
    /// Frames sent so far
    sequence: u32,
}

impl<C: TimestampSource> SimulatedTransmitter<C> {
    /// Create a transmitter whose first frame starts immediately
    pub fn new(clock: C, config: SimulatedConfig) -> Self {
        let next_frame_us = clock.now_us();
        Self {
            clock,
            config,
            encoder: PulseEncoder::default(),
            pending: VecDeque::new(),
            next_frame_us,
            sequence: 0,
        }
    }

    /// Reading carried by frame number `sequence`
    pub fn reading_for(sequence: u32) -> DecodedReading {
        let mut hasher = DefaultHasher::new();
        sequence.hash(&mut hasher);
        let hash = hasher.finish();

        DecodedReading {
            // 40.0-49.9 °C
            boiler_temp_raw: 400 + (hash % 100) as i16,
            // -10.0-+19.9 °C
            solar_temp_raw: -100 + ((hash >> 8) % 300) as i16,
            // 35.0-64.9 %
            boiler_humidity_raw: 350 + ((hash >> 16) % 300) as i16,
            // 20.0-89.9 %
            solar_humidity_raw: 200 + ((hash >> 24) % 700) as i16,
            // 990.0-1029.9 hPa
            boiler_pressure_raw: 9900 + ((hash >> 32) % 400) as i16,
        }
    }

    /// Frames sent so far
    pub fn frames_sent(&self) -> u32 {
        self.sequence
    }

    fn queue_frame(&mut self, start_us: u64) {
        let reading = Self::reading_for(self.sequence);
        let mut frame = encode_frame(SIMULATED_HEADER, &reading);

        let corrupt = self
            .config
            .corrupt_every
            .is_some_and(|n| n > 0 && self.sequence % n == n - 1);
        if corrupt {
            debug!("Corrupting simulated frame {}", self.sequence);
            frame[layout::BOILER_TEMP + 1] ^= 0x01;
        }

        let interval_us = self.config.frame_interval_ms * 1000;
        let air_time_us = self.encoder.frame_duration_us(&frame);
        self.pending.extend(self.encoder.encode(&frame, start_us));
        self.sequence = self.sequence.wrapping_add(1);
        self.next_frame_us = start_us + interval_us.max(air_time_us);
    }
}

impl<C: TimestampSource> EdgeSource for SimulatedTransmitter<C> {
    fn next_edge(&mut self, timeout: Duration) -> Result<Option<EdgeEvent>, SourceError> {
        if let Some(edge) = self.pending.pop_front() {
            return Ok(Some(edge));
        }

        let now = self.clock.now_us();
        if now < self.next_frame_us {
            let wait = Duration::from_micros(self.next_frame_us - now).min(timeout);
            if !wait.is_zero() {
                thread::sleep(wait);
            }
            return Ok(None);
        }

        self.queue_frame(now);
        Ok(self.pending.pop_front())
    }
}
