use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::LanguageModel;
use crate::domain::ChatMessage;

use super::budget::{assessment_chunking, quiz_targets};
use super::chunking::chunk_by_tokens;
use super::pipeline_error::PipelineError;
use super::summary_pipeline::{JOIN_SEPARATOR, MAX_INPUT_TOKENS};

const MAX_CHUNKS: usize = 20;
const MAP_TOKENS: u32 = 180;
const REDUCE_TOKENS: u32 = 600;
// Mild sampling keeps distractors varied without letting the format drift.
const MAP_TEMPERATURE: f32 = 0.25;
const REDUCE_TEMPERATURE: f32 = 0.2;

const MAP_SYSTEM: &str = "Generate high-quality MCQs for exams. Strong distractors.";
const REDUCE_SYSTEM: &str =
    "You are a meticulous exam MCQ editor. Output strictly the MCQ list only.";

/// One multiple-choice quiz, with questions kept as the model's line-based
/// text so the caller can render or re-parse them as it likes.
#[derive(Debug, Clone)]
pub struct QuizSheet {
    pub questions: String,
    pub title: String,
    /// The target the consolidation call was asked for, not a count of the
    /// questions actually produced.
    pub num_questions: usize,
    pub model: String,
    pub timestamp: String,
    pub truncated: bool,
}

/// Drafts multiple-choice questions per chunk, then consolidates the drafts
/// into a single deduplicated quiz sized by the document's length.
pub struct QuizPipeline<M: LanguageModel> {
    model: Arc<M>,
    model_label: String,
}

impl<M: LanguageModel> QuizPipeline<M> {
    pub fn new(model: Arc<M>, model_label: impl Into<String>) -> Self {
        Self {
            model,
            model_label: model_label.into(),
        }
    }

    pub async fn generate(&self, content: &str, title: &str) -> Result<QuizSheet, PipelineError> {
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
        let targets = quiz_targets(total_tokens, num_chunks);
        if chunk_set.truncated {
            tracing::warn!(
                max_chunks = MAX_CHUNKS,
                total_tokens,
                "Chunk cap reached, trailing input dropped from the quiz"
            );
        }
        tracing::info!(
            total_tokens,
            num_chunks,
            target_questions = targets.total,
            per_chunk = targets.per_chunk,
            "Starting quiz run"
        );

        let mut drafts = Vec::with_capacity(num_chunks);
        for (index, chunk) in chunk_set.chunks.iter().enumerate() {
            tracing::debug!(chunk = index + 1, num_chunks, "Drafting questions");
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
        let quiz = self
            .model
            .generate(&messages, REDUCE_TOKENS, REDUCE_TEMPERATURE)
            .await?;

        Ok(QuizSheet {
            questions: quiz.trim().to_string(),
            title: title.to_string(),
            num_questions: targets.total,
            model: format!(
                "{} (Exam MCQs, target={}, chunks={})",
                self.model_label, targets.total, num_chunks
            ),
            timestamp: Utc::now().to_rfc3339(),
            truncated: chunk_set.truncated,
        })
    }
}

fn map_prompt(per_chunk: usize, chunk: &str) -> String {
    format!(
        "Write {per_chunk} MCQs from the text. Follow strictly:\n\
         - One sentence per question\n\
         - 4 options A–D, only one correct\n\
         - Plausible distractors; rephrase; same category across options\n\
         - Shuffle correct letter across questions\n\
         - Output ONLY in this format:\n\
         \n\
         Q1) Question?\n\
         A) Option\n\
         B) Option\n\
         C) Option\n\
         D) Option\n\
         Correct: <Letter>\n\
         \n\
         TEXT:\n\
         {chunk}"
    )
}

fn reduce_prompt(target_total: usize, merged: &str) -> String {
    format!(
        "Combine the MCQs below into a SINGLE quiz of {target_total} questions.\n\
         Rules:\n\
         - Keep only the best, non-duplicate questions\n\
         - Maintain the required format exactly (no extra commentary)\n\
         - Ensure distribution of correct letters is shuffled\n\
         \n\
         MCQs:\n\
         {merged}"
    )
}
