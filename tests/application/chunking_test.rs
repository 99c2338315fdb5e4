use kuching::application::ports::LanguageModel;
use kuching::application::services::{ChunkingPolicy, chunk_by_tokens};

use super::scripted_model::ScriptedModel;

const NO_CAP: usize = usize::MAX;

fn words(count: usize) -> String {
    (0..count)
        .map(|i| format!("w{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn given_tokens_when_chunking_then_adjacent_windows_share_overlap() {
    let model = ScriptedModel::new();
    let ids = model.tokenize(&words(10)).unwrap();

    let policy = ChunkingPolicy {
        window: 4,
        overlap: 1,
    };
    let result = chunk_by_tokens(&model, &ids, policy, NO_CAP).unwrap();

    assert_eq!(
        result.chunks,
        vec!["w0 w1 w2 w3", "w3 w4 w5 w6", "w6 w7 w8 w9"]
    );
    assert!(!result.truncated);
}

#[test]
fn given_token_count_that_is_an_exact_multiple_when_chunking_then_no_empty_tail_chunk() {
    let model = ScriptedModel::new();
    let ids = model.tokenize(&words(8)).unwrap();

    let policy = ChunkingPolicy {
        window: 4,
        overlap: 0,
    };
    let result = chunk_by_tokens(&model, &ids, policy, NO_CAP).unwrap();

    assert_eq!(result.chunks, vec!["w0 w1 w2 w3", "w4 w5 w6 w7"]);
}

#[test]
fn given_window_larger_than_input_when_chunking_then_single_chunk_covers_everything() {
    let model = ScriptedModel::new();
    let ids = model.tokenize(&words(5)).unwrap();

    let policy = ChunkingPolicy {
        window: 100,
        overlap: 10,
    };
    let result = chunk_by_tokens(&model, &ids, policy, NO_CAP).unwrap();

    assert_eq!(result.chunks, vec!["w0 w1 w2 w3 w4"]);
    assert!(!result.truncated);
}

#[test]
fn given_no_tokens_when_chunking_then_returns_no_chunks() {
    let model = ScriptedModel::new();

    let policy = ChunkingPolicy {
        window: 4,
        overlap: 1,
    };
    let result = chunk_by_tokens(&model, &[], policy, NO_CAP).unwrap();

    assert!(result.chunks.is_empty());
    assert!(!result.truncated);
}

#[test]
fn given_chunk_cap_when_input_exceeds_it_then_truncates_and_flags() {
    let model = ScriptedModel::new();
    let ids = model.tokenize(&words(10)).unwrap();

    let policy = ChunkingPolicy {
        window: 4,
        overlap: 1,
    };
    let result = chunk_by_tokens(&model, &ids, policy, 2).unwrap();

    assert_eq!(result.chunks, vec!["w0 w1 w2 w3", "w3 w4 w5 w6"]);
    assert!(result.truncated);
}

#[test]
fn given_chunk_cap_reached_exactly_at_input_end_when_chunking_then_not_flagged_truncated() {
    let model = ScriptedModel::new();
    let ids = model.tokenize(&words(7)).unwrap();

    let policy = ChunkingPolicy {
        window: 4,
        overlap: 1,
    };
    let result = chunk_by_tokens(&model, &ids, policy, 2).unwrap();

    assert_eq!(result.chunks, vec!["w0 w1 w2 w3", "w3 w4 w5 w6"]);
    assert!(!result.truncated);
}

#[test]
fn given_overlap_at_least_window_when_chunking_then_still_makes_progress() {
    let model = ScriptedModel::new();
    let ids = model.tokenize(&words(4)).unwrap();

    let policy = ChunkingPolicy {
        window: 2,
        overlap: 5,
    };
    let result = chunk_by_tokens(&model, &ids, policy, NO_CAP).unwrap();

    // Overlap is clamped below the window, so each step advances by one.
    assert_eq!(result.chunks, vec!["w0 w1", "w1 w2", "w2 w3"]);
}
