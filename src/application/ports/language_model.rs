use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

use crate::domain::ChatMessage;

/// Incremental output of a streaming generation call: text fragments in
/// production order, finite, not restartable. Consumers must forward
/// fragments as they arrive rather than buffering the stream.
pub type TokenStream =
    Pin<Box<dyn Stream<Item = Result<String, LanguageModelError>> + Send + 'static>>;

/// The injected text-generation capability. Tokenization sits on the same
/// boundary because window sizing has to count tokens with the backend's
/// own vocabulary, not an approximation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, LanguageModelError>;

    fn detokenize(&self, ids: &[u32]) -> Result<String, LanguageModelError>;

    /// Run one chat completion to the end. Deterministic when `temperature`
    /// is 0.0, sampled otherwise.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<String, LanguageModelError>;

    async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        max_new_tokens: u32,
        temperature: f32,
    ) -> Result<TokenStream, LanguageModelError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LanguageModelError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("tokenization failed: {0}")]
    Tokenization(String),
}
