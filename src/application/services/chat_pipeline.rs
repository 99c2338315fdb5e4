use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use futures::stream::Stream;
use futures::stream::StreamExt;
use serde::Serialize;

use crate::application::ports::LanguageModel;
use crate::domain::ChatMessage;

use super::pipeline_error::PipelineError;

/// How many trailing history messages are kept when building the prompt.
/// A fixed window, not a per-request knob.
const HISTORY_WINDOW: usize = 6;
const THINKING_TOKENS: u32 = 300;
// The reasoning pass samples freely; the visible answer uses the caller's
// temperature.
const THINKING_TEMPERATURE: f32 = 0.7;

const THINKING_SUFFIX: &str =
    " Before responding, think about the question and explain your reasoning.";

/// One chat invocation. `history` is the transcript so far, oldest first,
/// without the new message.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    pub message: String,
    pub history: Vec<ChatMessage>,
    pub include_thinking: bool,
    pub max_new_tokens: u32,
    pub temperature: f32,
}

/// Blocking chat result. `thinking` is present only when the request asked
/// for the reasoning pass.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub message: String,
    pub thinking: Option<String>,
    pub model: String,
    pub timestamp: String,
}

/// Lifecycle events of one streamed chat turn. A turn is a thinking phase
/// (optional) followed by a message phase; each phase opens with a start
/// marker, streams deltas, and closes with a complete marker carrying the
/// full accumulated text. `Error` is terminal wherever it appears. The
/// serialized form is the wire contract of the streaming endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatStreamEvent {
    ThinkingStart,
    Thinking { token: String, text: String },
    ThinkingComplete { text: String },
    MessageStart,
    Message { token: String, text: String },
    MessageComplete { text: String },
    Error { message: String },
}

pub type ChatEventStream = Pin<Box<dyn Stream<Item = ChatStreamEvent> + Send + 'static>>;

/// Conversational interface over the shared backend. The reasoning pass is
/// a separate generation shown to the user for transparency; its transcript
/// is never fed back into the prompt that produces the visible answer.
pub struct ChatPipeline<M: LanguageModel> {
    model: Arc<M>,
    model_label: String,
    system_prompt: String,
}

impl<M: LanguageModel> ChatPipeline<M> {
    pub fn new(model: Arc<M>, model_label: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            model,
            model_label: model_label.into(),
            system_prompt: system_prompt.into(),
        }
    }

    pub async fn reply(&self, prompt: ChatPrompt) -> Result<ChatReply, PipelineError> {
        let base = self.base_messages(&prompt.history, prompt.include_thinking);

        let thinking = if prompt.include_thinking {
            let mut messages = base.clone();
            messages.push(ChatMessage::user(thinking_instruction(&prompt.message)));
            let text = self
                .model
                .generate(&messages, THINKING_TOKENS, THINKING_TEMPERATURE)
                .await?;
            tracing::debug!(chars = text.len(), "Reasoning pass complete");
            Some(text)
        } else {
            None
        };

        let mut messages = base;
        messages.push(ChatMessage::user(prompt.message));
        let message = self
            .model
            .generate(&messages, prompt.max_new_tokens, prompt.temperature)
            .await?;

        Ok(ChatReply {
            message,
            thinking,
            model: self.model_label.clone(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    pub fn reply_stream(&self, prompt: ChatPrompt) -> ChatEventStream
    where
        M: 'static,
    {
        let model = Arc::clone(&self.model);
        let base = self.base_messages(&prompt.history, prompt.include_thinking);

        Box::pin(async_stream::stream! {
            if prompt.include_thinking {
                let mut messages = base.clone();
                messages.push(ChatMessage::user(thinking_instruction(&prompt.message)));
                yield ChatStreamEvent::ThinkingStart;

                let mut tokens = match model
                    .generate_stream(&messages, THINKING_TOKENS, THINKING_TEMPERATURE)
                    .await
                {
                    Ok(stream) => stream,
                    Err(error) => {
                        yield ChatStreamEvent::Error { message: error.to_string() };
                        return;
                    }
                };
                let mut text = String::new();
                while let Some(token) = tokens.next().await {
                    match token {
                        Ok(token) => {
                            text.push_str(&token);
                            yield ChatStreamEvent::Thinking { token, text: text.clone() };
                        }
                        Err(error) => {
                            yield ChatStreamEvent::Error { message: error.to_string() };
                            return;
                        }
                    }
                }
                yield ChatStreamEvent::ThinkingComplete { text };
            }

            let mut messages = base;
            messages.push(ChatMessage::user(prompt.message));
            yield ChatStreamEvent::MessageStart;

            let mut tokens = match model
                .generate_stream(&messages, prompt.max_new_tokens, prompt.temperature)
                .await
            {
                Ok(stream) => stream,
                Err(error) => {
                    yield ChatStreamEvent::Error { message: error.to_string() };
                    return;
                }
            };
            let mut text = String::new();
            while let Some(token) = tokens.next().await {
                match token {
                    Ok(token) => {
                        text.push_str(&token);
                        yield ChatStreamEvent::Message { token, text: text.clone() };
                    }
                    Err(error) => {
                        yield ChatStreamEvent::Error { message: error.to_string() };
                        return;
                    }
                }
            }
            yield ChatStreamEvent::MessageComplete { text };
        })
    }

    /// A fresh conversation gets the configured system prompt, with the
    /// reasoning suffix appended when thinking is on. An ongoing one reuses
    /// its own transcript instead, trimmed to the window.
    fn base_messages(&self, history: &[ChatMessage], include_thinking: bool) -> Vec<ChatMessage> {
        if history.is_empty() {
            let mut system = self.system_prompt.clone();
            if include_thinking {
                system.push_str(THINKING_SUFFIX);
            }
            vec![ChatMessage::system(system)]
        } else {
            let start = history.len().saturating_sub(HISTORY_WINDOW);
            history[start..].to_vec()
        }
    }
}

fn thinking_instruction(message: &str) -> String {
    format!(
        "Think step by step about how to answer this question: {message}\n\n\
         Provide your reasoning as if you're planning your response. \
         Use bullet points to break down your thought process."
    )
}
