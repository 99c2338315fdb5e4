use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{FileLoaderError, LanguageModel};
use crate::domain::{ContentType, Document};
use crate::presentation::state::AppState;

use super::responses::error_response;

#[derive(Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub content: String,
}

/// Accepts one multipart file field, extracts its text, and returns it for
/// the client to feed into the generation endpoints. Extraction is
/// synchronous; uploads are capped well below anything that would take
/// meaningful time.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler<M>(
    State(state): State<AppState<M>>,
    mut multipart: Multipart,
) -> Response
where
    M: LanguageModel + 'static,
{
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read multipart: {}", e),
            );
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();
    let declared_mime = field.content_type().map(str::to_string);

    tracing::debug!(
        filename = %filename,
        content_type = declared_mime.as_deref().unwrap_or("unknown"),
        "Processing file upload"
    );

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(error = %e, "Failed to read file bytes");
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read file: {}", e),
            );
        }
    };

    let max_bytes = state.settings.upload.max_file_size_mb * 1024 * 1024;
    if data.len() > max_bytes {
        tracing::warn!(bytes = data.len(), max_bytes, "Upload exceeds size limit");
        return error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "File exceeds the {} MB limit",
                state.settings.upload.max_file_size_mb
            ),
        );
    }

    // The declared MIME wins; fall back to the extension for clients that
    // send everything as application/octet-stream.
    let content_type = declared_mime
        .as_deref()
        .and_then(ContentType::from_mime)
        .or_else(|| ContentType::from_filename(&filename));
    let content_type = match content_type {
        Some(ct) => ct,
        None => {
            tracing::warn!(filename = %filename, "Unsupported upload type");
            return error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported file type: {}", filename),
            );
        }
    };

    let document = Document::new(filename, content_type, data.len() as u64);

    match state.file_loader.extract_text(&data, &document).await {
        Ok(content) => {
            tracing::info!(
                document_id = %document.id.as_uuid(),
                chars = content.len(),
                "Document text extracted"
            );
            (
                StatusCode::OK,
                Json(UploadResponse {
                    success: true,
                    content,
                }),
            )
                .into_response()
        }
        Err(e @ FileLoaderError::UnsupportedContentType(_)) => {
            tracing::warn!(error = %e, "Extraction rejected upload");
            error_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, document_id = %document.id.as_uuid(), "Extraction failed");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
    }
}
