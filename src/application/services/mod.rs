pub mod budget;
pub mod chat_pipeline;
pub mod chunking;
pub mod flashcard_pipeline;
pub mod pipeline_error;
pub mod quiz_pipeline;
pub mod summary_pipeline;

pub use budget::{
    assessment_chunking, flashcard_targets, quiz_targets, summary_budget, summary_chunking,
    GenerationBudget, ItemTargets,
};
pub use chat_pipeline::{
    ChatEventStream, ChatPipeline, ChatPrompt, ChatReply, ChatStreamEvent,
};
pub use chunking::{chunk_by_tokens, ChunkSet, ChunkingPolicy};
pub use flashcard_pipeline::{FlashcardPipeline, FlashcardSet};
pub use pipeline_error::PipelineError;
pub use quiz_pipeline::{QuizPipeline, QuizSheet};
pub use summary_pipeline::{StudyNotes, SummaryPipeline, MAX_INPUT_TOKENS};
