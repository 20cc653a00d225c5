//! Edge Service
//!
//! Binds an edge source to a decoder on a dedicated thread. Spawning is the
//! `init` of the pipeline, [`EdgeService::shutdown`] (or drop) its `shutdown`.

use crate::error::SourceError;
use crate::EdgeSource;
use frame_decoder::{DecoderContext, StatusReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How long one wait on the source may take before re-checking shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Pause after a source error
const ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Running edge → decoder pipeline
pub struct EdgeService {
    reader: StatusReader,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<DecoderContext>>,
}

impl EdgeService {
    /// Start delivering edges from `source` to `decoder`
    pub fn spawn<S>(mut source: S, mut decoder: DecoderContext) -> Result<Self, SourceError>
    where
        S: EdgeSource + 'static,
    {
        let reader = decoder.reader();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let handle = thread::Builder::new()
            .name("rnts-edges".to_string())
            .spawn(move || {
                info!("Edge service started");
                let mut edges: u64 = 0;

                while !shutdown_flag.load(Ordering::SeqCst) {
                    match source.next_edge(POLL_INTERVAL) {
                        Ok(Some(edge)) => {
                            decoder.on_event(edge);
                            edges += 1;
                        }
                        Ok(None) => {}
                        Err(SourceError::Closed) => {
                            info!("Edge source closed after {} edges", edges);
                            break;
                        }
                        Err(e) => {
                            warn!("Edge source error: {}", e);
                            thread::sleep(ERROR_BACKOFF);
                        }
                    }
                }

                debug!("Edge service stopped after {} edges", edges);
                decoder
            })?;

        Ok(Self {
            reader,
            shutdown,
            handle: Some(handle),
        })
    }

    /// Read-only view of the decoder
    pub fn reader(&self) -> StatusReader {
        self.reader.clone()
    }

    /// Whether the worker thread is still delivering edges
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the worker and hand back the decoder
    pub fn shutdown(mut self) -> Option<DecoderContext> {
        self.stop()
    }

    fn stop(&mut self) -> Option<DecoderContext> {
        let handle = self.handle.take()?;
        info!("Stopping edge service");
        self.shutdown.store(true, Ordering::SeqCst);
        match handle.join() {
            Ok(decoder) => Some(decoder),
            Err(_) => {
                error!("Edge service thread panicked");
                None
            }
        }
    }
}

impl Drop for EdgeService {
    fn drop(&mut self) {
        self.stop();
    }
}
