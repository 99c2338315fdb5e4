use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::application::ports::LanguageModel;
use crate::presentation::state::AppState;

use super::cache_key::artifact_cache_key;
use super::responses::{Envelope, error_response, pipeline_error_response};

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub content: String,
    pub title: String,
}

#[derive(Serialize)]
pub struct SummaryData {
    pub content: String,
    pub title: String,
    pub model: String,
    pub timestamp: String,
    pub truncated: bool,
}

#[tracing::instrument(
    skip(state, request),
    fields(title = %request.title, content_chars = request.content.len())
)]
pub async fn summary_handler<M>(
    State(state): State<AppState<M>>,
    Json(request): Json<SummaryRequest>,
) -> Response
where
    M: LanguageModel + 'static,
{
    if request.content.trim().is_empty() {
        tracing::warn!("Summary request with empty content");
        return error_response(StatusCode::BAD_REQUEST, "content must not be empty");
    }

    let cache_key = artifact_cache_key("summary", &request.title, &request.content);
    if state.settings.cache.enabled {
        if let Some(hit) = state.artifact_cache.get(&cache_key).await {
            if let Ok(data) = serde_json::from_str::<serde_json::Value>(&hit) {
                tracing::info!("Study notes served from cache");
                return Envelope::ok(data);
            }
        }
    }

    match state
        .summary_pipeline
        .generate(&request.content, &request.title)
        .await
    {
        Ok(notes) => {
            tracing::info!(truncated = notes.truncated, "Study notes generated");
            let data = SummaryData {
                content: notes.content,
                title: notes.title,
                model: notes.model,
                timestamp: notes.timestamp,
                truncated: notes.truncated,
            };
            if state.settings.cache.enabled {
                if let Ok(serialized) = serde_json::to_string(&data) {
                    state
                        .artifact_cache
                        .put(
                            &cache_key,
                            serialized,
                            Duration::from_secs(state.settings.cache.ttl_seconds),
                        )
                        .await;
                }
            }
            Envelope::ok(data)
        }
        Err(e) => {
            tracing::error!(error = %e, "Study notes generation failed");
            pipeline_error_response(&e)
        }
    }
}
