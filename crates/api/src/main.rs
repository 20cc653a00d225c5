//! RNTS Monitor - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, telemetry, AppConfig, AppState};
use edge_source::{open_source, EdgeService};
use frame_decoder::DecoderContext;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("=== RNTS Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(source = ?config.source, "Opening edge source");

    let source = open_source(&config.source).context("failed to open edge source")?;
    let service = EdgeService::spawn(source, DecoderContext::new())?;

    let metrics = match telemetry::install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    };

    let state = Arc::new(AppState::new(service.reader(), metrics));
    let result = run_server(&config.server.bind, state).await;

    if let Some(decoder) = service.shutdown() {
        let counters = decoder.status().counters;
        info!(
            frames_total = counters.frames_total,
            frames_decoded = counters.frames_decoded(),
            checksum_failures = counters.checksum_failures,
            "Decoder stopped"
        );
    }

    result?;
    Ok(())
}
