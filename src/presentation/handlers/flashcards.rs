use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::application::ports::LanguageModel;
use crate::domain::Flashcard;
use crate::presentation::state::AppState;

use super::cache_key::artifact_cache_key;
use super::responses::{Envelope, error_response, pipeline_error_response};

#[derive(Debug, Deserialize)]
pub struct FlashcardRequest {
    pub content: String,
    pub title: String,
    /// Accepted for API compatibility; deck size is sized from the
    /// document instead.
    #[serde(default)]
    pub num_cards: Option<u32>,
}

#[derive(Serialize)]
pub struct FlashcardData {
    pub flashcards: Vec<Flashcard>,
    pub raw: String,
    pub title: String,
    pub num_cards: usize,
    pub model: String,
    pub timestamp: String,
    pub truncated: bool,
}

#[tracing::instrument(
    skip(state, request),
    fields(title = %request.title, content_chars = request.content.len())
)]
pub async fn flashcards_handler<M>(
    State(state): State<AppState<M>>,
    Json(request): Json<FlashcardRequest>,
) -> Response
where
    M: LanguageModel + 'static,
{
    if request.content.trim().is_empty() {
        tracing::warn!("Flashcard request with empty content");
        return error_response(StatusCode::BAD_REQUEST, "content must not be empty");
    }
    if let Some(requested) = request.num_cards {
        tracing::debug!(requested, "Requested card count is advisory only");
    }

    let cache_key = artifact_cache_key("flashcards", &request.title, &request.content);
    if state.settings.cache.enabled {
        if let Some(hit) = state.artifact_cache.get(&cache_key).await {
            if let Ok(data) = serde_json::from_str::<serde_json::Value>(&hit) {
                tracing::info!("Flashcards served from cache");
                return Envelope::ok(data);
            }
        }
    }

    match state
        .flashcard_pipeline
        .generate(&request.content, &request.title)
        .await
    {
        Ok(set) => {
            tracing::info!(
                num_cards = set.num_cards,
                truncated = set.truncated,
                "Flashcards generated"
            );
            let data = FlashcardData {
                flashcards: set.flashcards,
                raw: set.raw,
                title: set.title,
                num_cards: set.num_cards,
                model: set.model,
                timestamp: set.timestamp,
                truncated: set.truncated,
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
            tracing::error!(error = %e, "Flashcard generation failed");
            pipeline_error_response(&e)
        }
    }
}
