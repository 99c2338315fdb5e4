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
pub struct QuizRequest {
    pub content: String,
    pub title: String,
    /// Accepted for API compatibility; question count is sized from the
    /// document instead.
    #[serde(default)]
    pub num_questions: Option<u32>,
}

#[derive(Serialize)]
pub struct QuizData {
    pub questions: String,
    pub title: String,
    pub num_questions: usize,
    pub model: String,
    pub timestamp: String,
    pub truncated: bool,
}

#[tracing::instrument(
    skip(state, request),
    fields(title = %request.title, content_chars = request.content.len())
)]
pub async fn quiz_handler<M>(
    State(state): State<AppState<M>>,
    Json(request): Json<QuizRequest>,
) -> Response
where
    M: LanguageModel + 'static,
{
    if request.content.trim().is_empty() {
        tracing::warn!("Quiz request with empty content");
        return error_response(StatusCode::BAD_REQUEST, "content must not be empty");
    }
    if let Some(requested) = request.num_questions {
        tracing::debug!(requested, "Requested question count is advisory only");
    }

    let cache_key = artifact_cache_key("quiz", &request.title, &request.content);
    if state.settings.cache.enabled {
        if let Some(hit) = state.artifact_cache.get(&cache_key).await {
            if let Ok(data) = serde_json::from_str::<serde_json::Value>(&hit) {
                tracing::info!("Quiz served from cache");
                return Envelope::ok(data);
            }
        }
    }

    match state
        .quiz_pipeline
        .generate(&request.content, &request.title)
        .await
    {
        Ok(sheet) => {
            tracing::info!(
                num_questions = sheet.num_questions,
                truncated = sheet.truncated,
                "Quiz generated"
            );
            let data = QuizData {
                questions: sheet.questions,
                title: sheet.title,
                num_questions: sheet.num_questions,
                model: sheet.model,
                timestamp: sheet.timestamp,
                truncated: sheet.truncated,
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
            tracing::error!(error = %e, "Quiz generation failed");
            pipeline_error_response(&e)
        }
    }
}
