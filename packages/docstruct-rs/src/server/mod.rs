//! HTTP service: `POST /process-image/` plus a health check on `/`.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use docstruct_ocr::OcrEngine;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::PipelineError;
use crate::gemini::{InferenceError, StructuringModel};

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub ocr: Arc<dyn OcrEngine>,
    /// Outcome of setting the model up at startup, checked on every request.
    pub model: Result<Arc<dyn StructuringModel>, Arc<InferenceError>>,
}

impl AppState {
    pub fn new<M>(ocr: Arc<dyn OcrEngine>, model: Result<M, InferenceError>) -> Self
    where
        M: StructuringModel + 'static,
    {
        let model = match model {
            Ok(model) => {
                info!(model = model.name(), "structuring model configured");
                Ok(Arc::new(model) as Arc<dyn StructuringModel>)
            }
            Err(e) => {
                error!("FATAL ERROR: could not configure Gemini: {e}");
                Err(Arc::new(e))
            }
        };
        Self { ocr, model }
    }

    pub(crate) fn model(&self) -> Result<&dyn StructuringModel, PipelineError> {
        self.model
            .as_ref()
            .map(|m| m.as_ref())
            .map_err(|_| PipelineError::NotConfigured)
    }
}

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub bind: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/process-image/", post(handlers::process_image))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds and serves until Ctrl-C.
pub async fn serve(options: ServerOptions, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(options.bind)
        .await
        .with_context(|| format!("cannot bind {}", options.bind))?;
    info!(addr = %listener.local_addr()?, "docstruct listening");

    axum::serve(listener, router(state, options.max_upload_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
