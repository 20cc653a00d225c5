//! RNTS Frame Decoder
//!
//! Turns line edges into decoded sensor readings: interval classification,
//! bit/byte assembly, CRC check and field extraction, with the result
//! published to concurrent readers as one consistent status record.

mod assembler;
mod context;
mod status;

pub use assembler::FrameAssembler;
pub use context::{DecoderContext, StatusReader};
pub use status::{Counters, Status, STATUS_WORDS};
