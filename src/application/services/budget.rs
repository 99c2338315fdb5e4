//! Sizing tables for the chunked generation pipelines.
//!
//! The bands were tuned by hand against a single local backend. Larger
//! documents get wider windows, fewer calls with more context each, up to a
//! ceiling. Per-call generation budgets shrink as chunk count grows so the
//! total latency of a run stays bounded. The clamp bounds on item counts are
//! part of the service contract and are pinned by tests.

use super::chunking::ChunkingPolicy;

/// Per-call output budgets for one map/reduce run, in new tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationBudget {
    pub map_tokens: u32,
    pub reduce_tokens: u32,
}

/// Item-count targets for the quiz and flashcard pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTargets {
    /// How many items the final consolidated artifact should contain.
    pub total: usize,
    /// How many items each map call is asked to draft.
    pub per_chunk: usize,
}

pub fn summary_chunking(total_tokens: usize) -> ChunkingPolicy {
    let (window, overlap) = match total_tokens {
        0..=2_000 => (1_000, 60),
        2_001..=8_000 => (1_600, 100),
        8_001..=20_000 => (1_900, 140),
        _ => (2_100, 160),
    };
    ChunkingPolicy { window, overlap }
}

pub fn summary_budget(num_chunks: usize) -> GenerationBudget {
    let (map_tokens, reduce_tokens) = match num_chunks {
        0..=4 => (120, 700),
        5..=10 => (100, 600),
        11..=16 => (80, 500),
        _ => (60, 400),
    };
    GenerationBudget {
        map_tokens,
        reduce_tokens,
    }
}

/// Window geometry shared by the quiz and flashcard pipelines. Item writing
/// needs more context per chunk than extraction does, so these windows run
/// wider than the summary ones.
pub fn assessment_chunking(total_tokens: usize) -> ChunkingPolicy {
    let (window, overlap) = match total_tokens {
        0..=2_000 => (1_400, 80),
        2_001..=8_000 => (1_900, 120),
        8_001..=20_000 => (2_200, 150),
        _ => (2_400, 180),
    };
    ChunkingPolicy { window, overlap }
}

/// Question count scales with document length at one extra question per
/// 2,500 tokens on top of a base of ten, clamped to a band that keeps a
/// quiz usable for short and long documents alike.
pub fn quiz_targets(total_tokens: usize, num_chunks: usize) -> ItemTargets {
    let total = (total_tokens / 2_500 + 10).clamp(12, 30);
    let per_chunk = (total / num_chunks.max(1)).clamp(3, 6);
    ItemTargets { total, per_chunk }
}

/// Card count scales at one extra card per 2,000 tokens on top of a base of
/// fifteen.
pub fn flashcard_targets(total_tokens: usize, num_chunks: usize) -> ItemTargets {
    let total = (total_tokens / 2_000 + 15).clamp(15, 35);
    let per_chunk = (total / num_chunks.max(1)).clamp(4, 7);
    ItemTargets { total, per_chunk }
}
