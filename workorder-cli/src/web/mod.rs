//! Upload/download web front end (archive mode)
//!
//! - `GET /` serves a minimal upload form
//! - `POST /extract` takes a multipart `file` field holding an `.xlsx`
//!   workbook and answers with `Extracted_Files.zip`
//! - `GET /health` answers `ok`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};

use crate::config::ExtractConfig;
use crate::extract::excel::has_workbook_extension;
use crate::extract::{ARCHIVE_FILE_NAME, ExtractError, extract_to_archive};

/// Largest accepted upload
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const UPLOAD_PAGE_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Excel Extractor Tool</title></head>
<body>
  <h1>Excel Extractor Tool</h1>
  <p>Upload an Excel file, and download the filtered outputs automatically.</p>
  <form action="/extract" method="post" enctype="multipart/form-data">
    <input type="file" name="file" accept=".xlsx" required>
    <button type="submit">Download All Extracted Files</button>
  </form>
</body>
</html>
"#;

/// Build the web router around a fixed extraction configuration
pub fn router(config: Arc<ExtractConfig>) -> Router {
    Router::new()
        .route("/", get(serve_upload_page))
        .route("/extract", post(handle_extract))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(config)
}

/// Serve the router until the process is stopped (Ctrl-C shuts down gracefully)
pub async fn serve(addr: SocketAddr, config: ExtractConfig) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Serving extractor on http://{}", addr);

    axum::serve(listener, router(Arc::new(config)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutting down");
        })
        .await
        .context("Web server failed")
}

async fn serve_upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

async fn handle_extract(State(config): State<Arc<ExtractConfig>>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Malformed upload: {}", e);
                return (StatusCode::BAD_REQUEST, "Malformed upload.").into_response();
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, bytes.to_vec())),
            Err(e) => {
                log::warn!("Failed to read upload bytes: {}", e);
                return (StatusCode::BAD_REQUEST, "Failed to read file data.").into_response();
            }
        }
    }

    let Some((file_name, bytes)) = upload else {
        return (StatusCode::BAD_REQUEST, "No file provided.").into_response();
    };

    if !has_workbook_extension(&file_name) {
        let message = ExtractError::UnsupportedInput(file_name).to_string();
        return (StatusCode::BAD_REQUEST, message).into_response();
    }

    log::info!("Extracting uploaded workbook '{}' ({} bytes)", file_name, bytes.len());

    let result = tokio::task::spawn_blocking(move || extract_to_archive(&bytes, &config)).await;

    match result {
        Ok(Ok((archive, report))) => {
            log::info!(
                "Built {} with {} files ({} rows)",
                ARCHIVE_FILE_NAME,
                report.outputs.len(),
                report.total_rows()
            );
            (
                [
                    (header::CONTENT_TYPE, "application/zip".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
                    ),
                ],
                archive,
            )
                .into_response()
        }
        Ok(Err(e)) => {
            log::warn!("Extraction of '{}' failed: {:#}", file_name, e);
            (StatusCode::UNPROCESSABLE_ENTITY, format!("{:#}", e)).into_response()
        }
        Err(e) => {
            log::error!("Extraction task panicked: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Extraction failed.").into_response()
        }
    }
}
