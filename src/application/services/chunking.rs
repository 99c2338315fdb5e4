use crate::application::ports::{LanguageModel, LanguageModelError};

/// Window geometry for one chunking pass, in tokens. Selected per task by
/// the sizing tables in [`super::budget`]; `overlap` is always smaller than
/// `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingPolicy {
    pub window: usize,
    pub overlap: usize,
}

/// Output of a chunking pass. When `truncated` is set the chunk cap cut the
/// pass short and input past the last window is not represented in `chunks`
/// at all.
#[derive(Debug, Clone)]
pub struct ChunkSet {
    pub chunks: Vec<String>,
    pub truncated: bool,
}

/// Split a token sequence into overlapping windows and rehydrate each window
/// back to text. Adjacent windows share `policy.overlap` tokens so a concept
/// cut at a window boundary survives intact in at least one chunk. Stops
/// once `max_chunks` windows have been emitted; an empty sequence yields no
/// chunks.
pub fn chunk_by_tokens<M>(
    model: &M,
    ids: &[u32],
    policy: ChunkingPolicy,
    max_chunks: usize,
) -> Result<ChunkSet, LanguageModelError>
where
    M: LanguageModel + ?Sized,
{
    let window = policy.window.max(1);
    let overlap = policy.overlap.min(window - 1);

    let mut chunks = Vec::new();
    let mut truncated = false;
    let mut start = 0;
    let n = ids.len();

    while start < n {
        let end = (start + window).min(n);
        chunks.push(model.detokenize(&ids[start..end])?);
        if end == n {
            break;
        }
        start = end.saturating_sub(overlap);
        if chunks.len() >= max_chunks {
            truncated = true;
            break;
        }
    }

    Ok(ChunkSet { chunks, truncated })
}
