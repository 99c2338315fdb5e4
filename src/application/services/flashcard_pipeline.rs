use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::LanguageModel;
use crate::domain::{ChatMessage, Flashcard};

use super::budget::{assessment_chunking, flashcard_targets};
use super::chunking::chunk_by_tokens;
use super::pipeline_error::PipelineError;
use super::summary_pipeline::{JOIN_SEPARATOR, MAX_INPUT_TOKENS};

const MAX_CHUNKS: usize = 20;
const MAP_TOKENS: u32 = 200;
const REDUCE_TOKENS: u32 = 700;
const MAP_TEMPERATURE: f32 = 0.0;
const REDUCE_TEMPERATURE: f32 = 0.0;

const MAP_SYSTEM: &str = "Generate concise flashcards for memory recall. Deterministic.";
const REDUCE_SYSTEM: &str =
    "You are a meticulous flashcard editor. Output strictly the flashcard list only.";

/// One generated deck of term/definition cards.
#[derive(Debug, Clone)]
pub struct FlashcardSet {
    pub flashcards: Vec<Flashcard>,
    /// Consolidated model output before parsing. Kept so malformed cards
    /// are still recoverable by the caller.
    pub raw: String,
    pub title: String,
    /// Count of cards that survived parsing, not the consolidation target.
    pub num_cards: usize,
    pub model: String,
    pub timestamp: String,
    pub truncated: bool,
}

/// Drafts term/definition pairs per chunk, consolidates them into one deck,
/// then parses the line format into structured cards. Malformed entries are
/// dropped rather than failing the run.
pub struct FlashcardPipeline<M: LanguageModel> {
    model: Arc<M>,
    model_label: String,
}

impl<M: LanguageModel> FlashcardPipeline<M> {
    pub fn new(model: Arc<M>, model_label: impl Into<String>) -> Self {
        Self {
            model,
            model_label: model_label.into(),
        }
    }

    pub async fn generate(
        &self,
        content: &str,
        title: &str,
    ) -> Result<FlashcardSet, PipelineError> {
        let ids = self.model.tokenize(content)?;
        let total_tokens = ids.len();
        if total_tokens > MAX_INPUT_TOKENS {
            return Err(PipelineError::InputTooLarge {
                tokens: total_tokens,
                limit: MAX_INPUT_TOKENS,
            });
        }

        let policy = assessment_chunking(total_tokens);
        let chunk_set = chunk_by_tokens(self.model.as_ref(), &ids, policy, MAX_CHUNKS)?;
        if chunk_set.chunks.is_empty() {
            return Err(PipelineError::EmptyDocument);
        }
        let num_chunks = chunk_set.chunks.len();
        let targets = flashcard_targets(total_tokens, num_chunks);
        if chunk_set.truncated {
            tracing::warn!(
                max_chunks = MAX_CHUNKS,
                total_tokens,
                "Chunk cap reached, trailing input dropped from the deck"
            );
        }
        tracing::info!(
            total_tokens,
            num_chunks,
            target_cards = targets.total,
            per_chunk = targets.per_chunk,
            "Starting flashcard run"
        );

        let mut drafts = Vec::with_capacity(num_chunks);
        for (index, chunk) in chunk_set.chunks.iter().enumerate() {
            tracing::debug!(chunk = index + 1, num_chunks, "Drafting cards");
            let messages = [
                ChatMessage::system(MAP_SYSTEM),
                ChatMessage::user(map_prompt(targets.per_chunk, chunk)),
            ];
            let draft = self
                .model
                .generate(&messages, MAP_TOKENS, MAP_TEMPERATURE)
                .await?;
            drafts.push(draft);
        }

        let merged = drafts.join(JOIN_SEPARATOR);
        let messages = [
            ChatMessage::system(REDUCE_SYSTEM),
            ChatMessage::user(reduce_prompt(targets.total, &merged)),
        ];
        let consolidated = self
            .model
            .generate(&messages, REDUCE_TOKENS, REDUCE_TEMPERATURE)
            .await?;

        let flashcards = parse_flashcards(&consolidated);
        tracing::info!(
            parsed = flashcards.len(),
            target = targets.total,
            "Flashcard run complete"
        );

        Ok(FlashcardSet {
            num_cards: flashcards.len(),
            flashcards,
            raw: consolidated.trim().to_string(),
            title: title.to_string(),
            model: format!(
                "{} (Flashcards, target={}, chunks={})",
                self.model_label, targets.total, num_chunks
            ),
            timestamp: Utc::now().to_rfc3339(),
            truncated: chunk_set.truncated,
        })
    }
}

fn map_prompt(per_chunk: usize, chunk: &str) -> String {
    format!(
        "Generate {per_chunk} flashcards. Format (repeat for each):\n\
         Term: X\n\
         Definition: Y\n\
         \n\
         TEXT:\n\
         {chunk}"
    )
}

fn reduce_prompt(target_total: usize, merged: &str) -> String {
    format!(
        "Combine the flashcards below into a SINGLE set of {target_total} high-quality flashcards.\n\
         Rules:\n\
         - Keep only the best, non-duplicate terms\n\
         - Maintain the format exactly (Term: ... Definition: ...)\n\
         - Ensure definitions are clear and concise\n\
         \n\
         Flashcards:\n\
         {merged}"
    )
}

/// A card is any `Term:` segment with a `Definition:` marker and non-empty
/// text on both sides. Anything else in the model output, preambles, stray
/// bullets, half-finished cards, is skipped.
fn parse_flashcards(text: &str) -> Vec<Flashcard> {
    let mut cards = Vec::new();
    for segment in text.split("Term:").skip(1) {
        if let Some((term, definition)) = segment.split_once("Definition:") {
            let term = term.trim();
            let definition = definition.trim();
            if !term.is_empty() && !definition.is_empty() {
                cards.push(Flashcard {
                    term: term.to_string(),
                    definition: definition.to_string(),
                });
            }
        }
    }
    cards
}
