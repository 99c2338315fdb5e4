use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

use crate::application::ports::LanguageModelError;

// cl100k is a close enough proxy for the backend's own vocabulary: windows
// are sized conservatively, so a few percent of drift does not matter.
static TOKENIZER: LazyLock<CoreBPE> = LazyLock::new(|| {
    tiktoken_rs::cl100k_base().expect("Failed to initialize cl100k_base tokenizer")
});

pub(crate) fn encode(text: &str) -> Vec<u32> {
    TOKENIZER.encode_with_special_tokens(text)
}

pub(crate) fn decode(ids: &[u32]) -> Result<String, LanguageModelError> {
    TOKENIZER
        .decode(ids.to_vec())
        .map_err(|e| LanguageModelError::Tokenization(e.to_string()))
}
