//! HTTP boundary: multipart upload endpoint over the pipeline.

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::error::PipelineError;
use crate::intake::UploadedAudio;
use crate::pipeline::TranscriptionPipeline;
use crate::response::TranscriptionResponse;

/// Multipart field carrying the audio.
pub const FILE_FIELD: &str = "file";

/// Extra room above the intake limit for multipart framing, so oversized
/// files reach intake and get its typed error instead of a bare 413.
const BODY_LIMIT_HEADROOM: u64 = 1024 * 1024;

pub fn create_router(pipeline: TranscriptionPipeline) -> Router {
    let body_limit = pipeline
        .validator()
        .max_bytes()
        .saturating_add(BODY_LIMIT_HEADROOM)
        .min(usize::MAX as u64) as usize;

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/", get(health_handler))
        .route("/api/transcribe", post(transcribe_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(trace_layer)
        .with_state(pipeline)
}

async fn health_handler() -> &'static str {
    "Server is running!"
}

#[tracing::instrument(skip_all)]
async fn transcribe_handler(
    State(pipeline): State<TranscriptionPipeline>,
    multipart: Multipart,
) -> impl IntoResponse {
    let result = match read_upload(multipart).await {
        Ok(upload) => pipeline.transcribe(upload).await,
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            let limit = pipeline.validator().max_bytes();
            tracing::warn!(limit, "upload rejected: body over limit");
            Err(PipelineError::too_large(limit))
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to read multipart body");
            Err(PipelineError::InvalidInput(format!(
                "Failed to read upload: {}",
                e.body_text()
            )))
        }
    };

    let (status, body) = TranscriptionResponse::from_result(&result);
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body))
}

/// Pull the `file` part; other fields, and a plain `file` form value without
/// a filename parameter, are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<Option<UploadedAudio>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(ToString::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        tracing::debug!(filename = ?filename, bytes = bytes.len(), "file field received");
        return Ok(Some(UploadedAudio {
            bytes: bytes.to_vec(),
            filename: Some(filename),
        }));
    }
    Ok(None)
}
