use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{LanguageModel, LanguageModelError, TokenStream};
use crate::domain::{ChatMessage, MessageRole};

use super::tokenizer;

/// Offline stand-in for the real backend. Every generation echoes the last
/// user message, streamed word by word, so the full request path can be
/// exercised without a model server. Tokenization is the real thing, which
/// keeps chunking and budget selection honest.
pub struct MockLanguageModel {
    response_delay: Duration,
}

impl MockLanguageModel {
    pub fn new(response_delay_ms: u64) -> Self {
        Self {
            response_delay: Duration::from_millis(response_delay_ms),
        }
    }

    async fn simulate_latency(&self) {
        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }
    }

    fn echo(messages: &[ChatMessage]) -> String {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        format!("Echo: {}", last_user)
    }
}

impl Default for MockLanguageModel {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, LanguageModelError> {
        Ok(tokenizer::encode(text))
    }

    fn detokenize(&self, ids: &[u32]) -> Result<String, LanguageModelError> {
        tokenizer::decode(ids)
    }

    async fn generate(
        &self,
        messages: &[ChatMessage],
        _max_new_tokens: u32,
        _temperature: f32,
    ) -> Result<String, LanguageModelError> {
        self.simulate_latency().await;
        Ok(Self::echo(messages))
    }

    async fn generate_stream(
        &self,
        messages: &[ChatMessage],
        _max_new_tokens: u32,
        _temperature: f32,
    ) -> Result<TokenStream, LanguageModelError> {
        self.simulate_latency().await;
        let content = Self::echo(messages);
        let words: Vec<Result<String, LanguageModelError>> = content
            .split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                Ok(if i == 0 {
                    word.to_string()
                } else {
                    format!(" {}", word)
                })
            })
            .collect();
        Ok(Box::pin(futures::stream::iter(words)))
    }
}
