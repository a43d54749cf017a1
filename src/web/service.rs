//! Upload-and-scan HTTP service
//!
//! `POST /scan` takes a multipart upload in the `malware` field, stages it
//! in a uniquely named temporary file and runs one scan against it. Every
//! request is independent; the staged file and the scan path live entirely
//! in the request handler, so concurrent uploads cannot interfere.

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::{self, EngineConfig, ScanReport};

/// Address the scan service listens on.
const LISTEN_ADDR: &str = "0.0.0.0:3993";
/// Wall-clock budget for one web-triggered scan.
const WEB_SCAN_TIMEOUT: Duration = Duration::from_secs(60);
/// Multipart form field carrying the sample.
const UPLOAD_FIELD: &str = "malware";
/// Largest accepted upload.
const UPLOAD_LIMIT: usize = 32 * 1024 * 1024;

const MISSING_FILE_MESSAGE: &str = "Please supply a valid file to scan.\n";

#[derive(Clone)]
struct AppState {
    config: Arc<EngineConfig>,
}

/// Serve `POST /scan` until the process is terminated.
pub async fn serve(config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.check_binaries()?;

    let app = router(config);
    log::info!("web service listening on {}", LISTEN_ADDR);
    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(config: EngineConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };
    Router::new()
        .route("/scan", post(scan_handler))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
        .with_state(state)
}

async fn scan_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let data = loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some(UPLOAD_FIELD) => {
                log::debug!(
                    "uploaded file name: {}",
                    field.file_name().unwrap_or_default()
                );
                match field.bytes().await {
                    Ok(data) => break data,
                    Err(e) => {
                        // Oversize uploads land here as 413, not as the
                        // missing-field 400.
                        log::error!("failed to read upload: {}", e);
                        return (e.status(), "failed to read uploaded file\n").into_response();
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => {
                log::error!("scan request without a '{}' form field", UPLOAD_FIELD);
                return (StatusCode::BAD_REQUEST, MISSING_FILE_MESSAGE).into_response();
            }
            Err(e) => {
                log::error!("failed to read multipart request: {}", e);
                return (e.status(), "failed to read uploaded file\n").into_response();
            }
        }
    };

    // The NamedTempFile guard removes the staged upload on every exit path.
    let staged = match stage_upload(&data) {
        Ok(staged) => staged,
        Err(e) => {
            log::error!("failed to stage upload: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to stage upload\n")
                .into_response();
        }
    };

    match engine::scan(&state.config, staged.path(), WEB_SCAN_TIMEOUT).await {
        Ok(results) => Json(ScanReport { results }).into_response(),
        Err(e) => {
            log::error!("scan invocation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "scan failed\n").into_response()
        }
    }
}

fn stage_upload(data: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut staged = tempfile::Builder::new().prefix("web_").tempfile()?;
    staged.write_all(data)?;
    staged.flush()?;
    Ok(staged)
}
