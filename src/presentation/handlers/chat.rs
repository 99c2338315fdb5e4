use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};

use crate::application::ports::LanguageModel;
use crate::application::services::{ChatPrompt, ChatStreamEvent};
use crate::domain::ChatMessage;
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::Settings;
use crate::presentation::state::AppState;

use super::responses::{error_response, pipeline_error_response};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Prior transcript, oldest first. Roles outside system/user/assistant
    /// are rejected at deserialization.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    #[serde(default = "default_include_thinking")]
    pub include_thinking: bool,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

fn default_include_thinking() -> bool {
    true
}

#[derive(Serialize)]
pub struct ChatData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    pub model: String,
    pub timestamp: String,
}

/// Top-level `message` mirrors `data.message` for clients that only want
/// the text.
#[derive(Serialize)]
pub struct ChatResponseBody {
    pub success: bool,
    pub message: String,
    pub data: ChatData,
}

fn to_prompt(settings: &Settings, request: ChatRequest) -> ChatPrompt {
    ChatPrompt {
        message: request.message,
        history: request.history,
        include_thinking: request.include_thinking,
        max_new_tokens: request.max_tokens.unwrap_or(settings.chat.max_tokens),
        temperature: request.temperature.unwrap_or(settings.chat.temperature),
    }
}

#[tracing::instrument(
    skip(state, request),
    fields(history_len = request.history.len(), include_thinking = request.include_thinking)
)]
pub async fn chat_handler<M>(
    State(state): State<AppState<M>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    M: LanguageModel + 'static,
{
    tracing::debug!(message = %sanitize_prompt(&request.message), "Processing chat request");

    if request.message.trim().is_empty() {
        tracing::warn!("Chat request with empty message");
        return error_response(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    let prompt = to_prompt(&state.settings, request);
    match state.chat_pipeline.reply(prompt).await {
        Ok(reply) => {
            tracing::info!(chars = reply.message.len(), "Chat response generated");
            let body = ChatResponseBody {
                success: true,
                message: reply.message.clone(),
                data: ChatData {
                    message: reply.message,
                    thinking: reply.thinking,
                    model: reply.model,
                    timestamp: reply.timestamp,
                },
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Chat generation failed");
            pipeline_error_response(&e)
        }
    }
}

#[tracing::instrument(
    skip(state, request),
    fields(history_len = request.history.len(), include_thinking = request.include_thinking)
)]
pub async fn chat_stream_handler<M>(
    State(state): State<AppState<M>>,
    Json(request): Json<ChatRequest>,
) -> Response
where
    M: LanguageModel + 'static,
{
    tracing::debug!(message = %sanitize_prompt(&request.message), "Processing streaming chat request");

    if request.message.trim().is_empty() {
        tracing::warn!("Streaming chat request with empty message");
        return error_response(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    let keep_alive_seconds = state.settings.chat.sse_keep_alive_seconds;
    let prompt = to_prompt(&state.settings, request);
    let mut events = state.chat_pipeline.reply_stream(prompt);

    let sse_stream = async_stream::stream! {
        let mut failed = false;
        while let Some(event) = events.next().await {
            if matches!(event, ChatStreamEvent::Error { .. }) {
                tracing::error!("Chat stream terminated by error event");
                failed = true;
            }
            let json = serde_json::to_string(&event).unwrap_or_default();
            yield Ok::<_, Infallible>(Event::default().data(json));
        }
        // The terminator is only sent after a clean run; an error event is
        // already terminal for the client.
        if !failed {
            yield Ok(Event::default().data("[DONE]"));
        }
    };

    Sse::new(sse_stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(keep_alive_seconds))
                .text("keep-alive"),
        )
        .into_response()
}
