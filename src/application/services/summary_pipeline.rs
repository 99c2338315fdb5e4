use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::LanguageModel;
use crate::domain::ChatMessage;

use super::budget::{summary_budget, summary_chunking};
use super::chunking::chunk_by_tokens;
use super::pipeline_error::PipelineError;

/// Hard ceiling on tokenized input, shared by every pipeline. Documents past
/// this point have to be split by the caller before upload.
pub const MAX_INPUT_TOKENS: usize = 120_000;

const MAX_CHUNKS: usize = 24;
const MAP_TEMPERATURE: f32 = 0.0;
const REDUCE_TEMPERATURE: f32 = 0.0;

/// Separator between per-chunk notes in the reduce prompt, distinctive
/// enough that the model does not mistake it for document content.
pub(crate) const JOIN_SEPARATOR: &str = "\n\n-----\n\n";

const MAP_SYSTEM: &str =
    "Summarize accurately. Bullet points only. No hallucinations. No paragraphs.";
const REDUCE_SYSTEM: &str = "You produce exam-ready structured notes.";

/// Consolidated study notes for one document.
#[derive(Debug, Clone)]
pub struct StudyNotes {
    pub content: String,
    pub title: String,
    /// Backend label annotated with the run parameters, for display.
    pub model: String,
    pub timestamp: String,
    /// Set when the chunk cap dropped trailing input.
    pub truncated: bool,
}

/// Turns an arbitrarily long document into structured study notes with a
/// map/reduce pass: every chunk is condensed to bullet notes, then a single
/// consolidation call merges the notes into the final sectioned artifact.
pub struct SummaryPipeline<M: LanguageModel> {
    model: Arc<M>,
    model_label: String,
}

impl<M: LanguageModel> SummaryPipeline<M> {
    pub fn new(model: Arc<M>, model_label: impl Into<String>) -> Self {
        Self {
            model,
            model_label: model_label.into(),
        }
    }

    pub async fn generate(&self, content: &str, title: &str) -> Result<StudyNotes, PipelineError> {
        let ids = self.model.tokenize(content)?;
        let total_tokens = ids.len();
        if total_tokens > MAX_INPUT_TOKENS {
            return Err(PipelineError::InputTooLarge {
                tokens: total_tokens,
                limit: MAX_INPUT_TOKENS,
            });
        }

        let policy = summary_chunking(total_tokens);
        let chunk_set = chunk_by_tokens(self.model.as_ref(), &ids, policy, MAX_CHUNKS)?;
        if chunk_set.chunks.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }
        let num_chunks = chunk_set.chunks.len();
        let budget = summary_budget(num_chunks);
        if chunk_set.truncated {
            tracing::warn!(
                max_chunks = MAX_CHUNKS,
                total_tokens,
                "Chunk cap reached, trailing input dropped from the notes"
            );
        }
        tracing::info!(
            total_tokens,
            num_chunks,
            window = policy.window,
            map_tokens = budget.map_tokens,
            reduce_tokens = budget.reduce_tokens,
            "Starting study notes run"
        );

        let mut notes = Vec::with_capacity(num_chunks);
        for (index, chunk) in chunk_set.chunks.iter().enumerate() {
            tracing::debug!(chunk = index + 1, num_chunks, "Condensing chunk");
            let messages = [
                ChatMessage::system(MAP_SYSTEM),
                ChatMessage::user(format!(
                    "Summarize into crisp bullet points. Keep definitions and mechanisms.\n\n{chunk}"
                )),
            ];
            let note = self
                .model
                .generate(&messages, budget.map_tokens, MAP_TEMPERATURE)
                .await?;
            notes.push(note);
        }

        let merged = notes.join(JOIN_SEPARATOR);
        let messages = [
            ChatMessage::system(REDUCE_SYSTEM),
            ChatMessage::user(reduce_prompt(&merged)),
        ];
        let consolidated = self
            .model
            .generate(&messages, budget.reduce_tokens, REDUCE_TEMPERATURE)
            .await?;

        Ok(StudyNotes {
            content: consolidated.trim().to_string(),
            title: title.to_string(),
            model: format!(
                "{} (Study Notes, map={}, reduce={}, chunks={})",
                self.model_label, budget.map_tokens, budget.reduce_tokens, num_chunks
            ),
            timestamp: Utc::now().to_rfc3339(),
            truncated: chunk_set.truncated,
        })
    }
}

fn reduce_prompt(merged: &str) -> String {
    format!(
        "Convert the combined notes into structured study notes.\n\
         \n\
         Rules:\n\
         - KEEP important details; remove only exact duplicates.\n\
         - DO NOT write paragraphs.\n\
         - Group related ideas; keep bullets short.\n\
         - Prefer mechanisms, definitions, cause→effect links.\n\
         \n\
         Output:\n\
         ### Executive Summary (4–6 short bullets)\n\
         ### Core Concepts (10–20 bullets)\n\
         ### Key Terms & Definitions (5–15 items)\n\
         ### Processes / Mechanisms (numbered steps if present)\n\
         ### Cause → Effect (if applicable)\n\
         \n\
         {merged}"
    )
}
