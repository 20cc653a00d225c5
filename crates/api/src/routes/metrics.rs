//! Metrics Route

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::telemetry::record_status;
use crate::AppState;

/// Prometheus scrape endpoint
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => {
            record_status(&state.reader.status());
            (StatusCode::OK, handle.render()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
