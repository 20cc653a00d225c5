//! Plain-text Status Report

use frame_decoder::Status;
use std::fmt::Write;

/// Render the status the way the device node presents it
pub fn format_report(status: &Status) -> String {
    let c = &status.counters;
    let r = &status.reading;

    let mut out = String::with_capacity(160);
    // Writing to a String cannot fail
    let _ = write!(
        out,
        "frames: {}, incomplete: {}, crc: {}\n\n\
         BOILER/SOLAR: {} °C | {} °C\n\
         BOILER/SOLAR: {} | {} %\n\
         BOILER: {} hPa\n",
        c.frames_total,
        c.frames_incomplete,
        c.checksum_failures,
        r.boiler_temp(),
        r.solar_temp(),
        r.boiler_humidity(),
        r.solar_humidity(),
        r.boiler_pressure(),
    );
    out
}
