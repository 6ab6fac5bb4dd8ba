//! HTTP surface.
//!
//! Two routes:
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | rescans the image tree and renders the slideshow page |
//! | `GET /<images_dir>/*` | serves the image files themselves (read only) |
//!
//! Every page request runs a fresh selection, so a browser reload always picks
//! up the newest frames. The page is sent with `Cache-Control: no-store`; the
//! images rely on their `?v=<mtime>` marker instead.

use crate::config::{self, SiteConfig};
use crate::render::{self, Page};
use crate::select;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bind address {0}: {1}")]
    Bind(String, std::net::AddrParseError),
}

/// Immutable per-process state shared by all requests.
#[derive(Debug)]
pub struct AppState {
    /// Absolute image tree scanned on each request.
    pub images_root: PathBuf,
    /// URL prefix for frames, e.g. `images`.
    pub url_prefix: String,
    pub frame_limit: usize,
    pub title: String,
    /// Stylesheet with config colors already applied.
    pub css: String,
}

impl AppState {
    pub fn from_config(config: &SiteConfig, site_root: &Path) -> Self {
        Self {
            images_root: config.images_root(site_root),
            url_prefix: config.url_prefix(),
            frame_limit: config::effective_frames(config),
            title: config.title.clone(),
            css: render::page_css(config),
        }
    }

    /// Run the selector and map records to fetchable frame URLs.
    pub fn frame_urls(&self) -> Vec<String> {
        select::select_recent(&self.images_root, self.frame_limit)
            .iter()
            .map(|record| record.url(&self.url_prefix))
            .collect()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let images = ServeDir::new(&state.images_root);
    // Routing sees the raw request path, so mount on the encoded prefix
    let mount = format!("/{}", select::encode_path(&state.url_prefix));
    Router::new()
        .route("/", get(index))
        .nest_service(&mount, images)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let scan_state = Arc::clone(&state);
    let frames = match tokio::task::spawn_blocking(move || scan_state.frame_urls()).await {
        Ok(frames) => frames,
        Err(err) => {
            error!(error = %err, "frame selection task failed");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    info!(frames = frames.len(), "rendering page");

    let markup = render::render_page(&Page {
        title: &state.title,
        images_dir: &state.url_prefix,
        frames: &frames,
        css: &state.css,
    });
    (
        [(header::CACHE_CONTROL, "no-store")],
        Html(markup.into_string()),
    )
        .into_response()
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, bind: &str) -> Result<(), ServeError> {
    let address: SocketAddr = bind
        .parse()
        .map_err(|e| ServeError::Bind(bind.to_string(), e))?;
    info!(
        root = %state.images_root.display(),
        frames = state.frame_limit,
        "serving slideshow on http://{}",
        address
    );
    if !state.images_root.is_dir() {
        info!(root = %state.images_root.display(), "image directory does not exist yet");
    }

    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
