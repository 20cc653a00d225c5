//! RNTS Monitor API
//!
//! HTTP view of the decoder status: JSON and plain-text reports, health and
//! Prometheus metrics.

use axum::{extract::State, routing::get, Json, Router};
use frame_decoder::StatusReader;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
pub mod report;
mod routes;
pub mod telemetry;

pub use config::AppConfig;
pub use error::ApiError;

use config::LoggingConfig;

/// Application state shared across handlers
pub struct AppState {
    /// Decoder status
    pub reader: StatusReader,
    /// Prometheus handle, `None` when metrics are disabled
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(reader: StatusReader, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            reader,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: DecoderMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub decoder: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub last_frame_us: Option<u64>,
}

/// Decoder metrics
#[derive(Debug, Serialize)]
pub struct DecoderMetrics {
    pub frames_total: u32,
    pub frames_decoded: u32,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/status", get(routes::status::get_status))
        .route("/api/v1/status/text", get(routes::status::get_status_text))
        .route("/metrics", get(routes::metrics::get_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let status = state.reader.status();
    let decoder_status = if status.decoded_at_us.is_some() {
        "ok"
    } else {
        "waiting"
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            decoder: ComponentHealth {
                status: decoder_status.to_string(),
                last_frame_us: status.decoded_at_us,
            },
        },
        metrics: DecoderMetrics {
            frames_total: status.counters.frames_total,
            frames_decoded: status.counters.frames_decoded(),
        },
    })
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| ApiError::Logging(format!("unknown log level '{}'", config.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| ApiError::Logging(e.to_string()))
}

/// Run the server until Ctrl-C
pub async fn run_server(addr: &str, state: Arc<AppState>) -> Result<(), ApiError> {
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
