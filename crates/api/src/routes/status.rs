//! Status Routes

use axum::{extract::State, Json};
use frame_decoder::Counters;
use pulse_protocol::DecodedReading;
use serde::Serialize;
use std::sync::Arc;

use crate::report::format_report;
use crate::AppState;

/// Reading in physical units alongside the raw values
#[derive(Debug, Serialize)]
pub struct ReadingView {
    pub boiler_temp_c: f64,
    pub solar_temp_c: f64,
    pub boiler_humidity_pct: f64,
    pub solar_humidity_pct: f64,
    pub boiler_pressure_hpa: f64,
    pub raw: DecodedReading,
}

impl From<DecodedReading> for ReadingView {
    fn from(raw: DecodedReading) -> Self {
        Self {
            boiler_temp_c: raw.boiler_temp().as_f64(),
            solar_temp_c: raw.solar_temp().as_f64(),
            boiler_humidity_pct: raw.boiler_humidity().as_f64(),
            solar_humidity_pct: raw.solar_humidity().as_f64(),
            boiler_pressure_hpa: raw.boiler_pressure().as_f64(),
            raw,
        }
    }
}

/// Response for the status endpoint
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// `None` until the first valid frame
    pub reading: Option<ReadingView>,
    pub counters: Counters,
    pub frames_decoded: u32,
    pub decoded_at_us: Option<u64>,
}

/// Latest decoded status as JSON
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let status = state.reader.status();

    Json(StatusResponse {
        reading: status.decoded_at_us.map(|_| status.reading.into()),
        counters: status.counters,
        frames_decoded: status.counters.frames_decoded(),
        decoded_at_us: status.decoded_at_us,
    })
}

/// Latest decoded status as the plain-text report
pub async fn get_status_text(State(state): State<Arc<AppState>>) -> String {
    format_report(&state.reader.status())
}
