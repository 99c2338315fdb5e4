use crate::application::ports::LanguageModelError;

/// Failure of one generation pipeline run. Map/reduce tasks are
/// all-or-nothing: a failed run never returns a partial artifact.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Raised before any generation call when the tokenized input exceeds
    /// the hard ceiling.
    #[error("input too large: {tokens} tokens (limit {limit}), split the document first")]
    InputTooLarge { tokens: usize, limit: usize },
    #[error("document contains no usable text")]
    EmptyDocument,
    #[error("generation: {0}")]
    Generation(#[from] LanguageModelError),
}
