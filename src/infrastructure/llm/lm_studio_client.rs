use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{LanguageModel, LanguageModelError, TokenStream};
use crate::domain::ChatMessage;

use super::tokenizer;

/// Client for an OpenAI-compatible chat completions server such as LM
/// Studio. One instance is shared by every pipeline; output budgets and
/// temperatures are per call, chosen by the callers.
pub struct LmStudioClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl LmStudioClient {
    pub fn new(base_url: &str, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn request_body(
        &self,
        messages: &[ChatMessage],
        max_new_tokens: u32,
        temperature: f32,
        stream: bool,
    ) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            max_tokens: max_new_tokens,
            temperature,
            stream: stream.then_some(true),
        }
    }

    async fn post_completions(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<reqwest::Response, LanguageModelError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| LanguageModelError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LanguageModelError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LanguageModelError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for LmStudioClient {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, LanguageModelError> {
        Ok(tokenizer::encode(text))
    }

    fn detokenize(&self, ids: &[u32]) -> Result<String, LanguageModelError> {
        tokenizer::decode(ids)
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String, LanguageModelError> {
        let body = self.request_body(messages, max_new_tokens, temperature, false);
        let response = self.post_completions(&body).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LanguageModelError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LanguageModelError::InvalidResponse("empty choices".to_string()))
    }

    async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<TokenStream, LanguageModelError> {
        let body = self.request_body(messages, max_new_tokens, temperature, true);
        let response = self.post_completions(&body).await?;

        let stream = response.bytes_stream();
        let token_stream = Box::pin(stream.flat_map(|chunk_result| {
            let items: Vec<Result<String, LanguageModelError>> = match chunk_result {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    let mut tokens = Vec::new();
                    for line in text.lines() {
                        if let Some(data) = line.strip_prefix("data: ") {
                            if data == "[DONE]" {
                                break;
                            }
                            if let Ok(chunk) = serde_json::from_str::<ChatCompletionChunk>(data) {
                                if let Some(choice) = chunk.choices.first() {
                                    if let Some(content) = &choice.delta.content {
                                        tokens.push(Ok(content.clone()));
                                    }
                                }
                            }
                        }
                    }
                    tokens
                }
                Err(e) => vec![Err(LanguageModelError::ApiRequestFailed(e.to_string()))],
            };
            futures::stream::iter(items)
        }));

        Ok(token_stream)
    }
}
