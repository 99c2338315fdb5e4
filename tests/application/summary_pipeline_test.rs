use std::sync::Arc;

use kuching::application::services::{PipelineError, SummaryPipeline};
use kuching::domain::MessageRole;

use super::scripted_model::ScriptedModel;

const TEST_LABEL: &str = "Test-1B";

fn distinct_words(count: usize) -> String {
    (0..count)
        .map(|i| format!("w{i:04}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[tokio::test]
async fn given_short_document_when_generating_notes_then_one_map_call_and_one_reduce_call() {
    let model = Arc::new(ScriptedModel::with_responses(&[
        "- cells capture light",
        "### Executive Summary\n- final notes",
    ]));
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    let notes = pipeline
        .generate("Cells capture light energy in chloroplasts.", "Biology")
        .await
        .unwrap();

    let calls = model.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].messages[0].role, MessageRole::System);
    assert!(calls[0].messages[1].content.contains("chloroplasts."));
    assert_eq!(calls[1].messages[0].role, MessageRole::System);
    assert!(calls[1].messages[1].content.contains("- cells capture light"));

    assert_eq!(notes.content, "### Executive Summary\n- final notes");
    assert_eq!(notes.title, "Biology");
    assert!(!notes.truncated);
}

#[tokio::test]
async fn given_document_spanning_two_windows_when_generating_notes_then_chunks_overlap_and_notes_merge()
 {
    let model = Arc::new(ScriptedModel::with_responses(&["alpha", "beta", "merged"]));
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    // 2_500 tokens lands in the 1_600/100 window band: two chunks.
    let content = distinct_words(2_500);
    let notes = pipeline.generate(&content, "Long doc").await.unwrap();

    let calls = model.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[0].messages[1].content.contains("w0000"));
    assert!(calls[1].messages[1].content.contains("w2499"));
    // The second window re-reads the overlap tail of the first.
    assert!(calls[0].messages[1].content.contains("w1599"));
    assert!(calls[1].messages[1].content.contains("w1500"));

    // Map notes arrive in the reduce prompt joined by the separator.
    assert!(
        calls[2]
            .messages[1]
            .content
            .contains("alpha\n\n-----\n\nbeta")
    );
    assert_eq!(notes.content, "merged");
}

#[tokio::test]
async fn given_two_chunks_when_generating_notes_then_small_run_budget_applies() {
    let model = Arc::new(ScriptedModel::new());
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    pipeline
        .generate(&distinct_words(2_500), "Long doc")
        .await
        .unwrap();

    let calls = model.calls();
    assert_eq!(calls[0].max_new_tokens, 120);
    assert_eq!(calls[0].temperature, 0.0);
    assert_eq!(calls[1].max_new_tokens, 120);
    assert_eq!(calls[2].max_new_tokens, 700);
    assert_eq!(calls[2].temperature, 0.0);
}

#[tokio::test]
async fn given_completed_run_when_generating_notes_then_model_label_carries_run_parameters() {
    let model = Arc::new(ScriptedModel::new());
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    let notes = pipeline
        .generate(&distinct_words(2_500), "Long doc")
        .await
        .unwrap();

    assert_eq!(notes.model, "Test-1B (Study Notes, map=120, reduce=700, chunks=2)");
    assert!(notes.timestamp.contains('T'));
}

#[tokio::test]
async fn given_document_past_chunk_cap_when_generating_notes_then_truncated_is_flagged() {
    let model = Arc::new(ScriptedModel::new());
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    // Enough tokens that the 2_100/160 window cannot cover the input in
    // twenty-four chunks.
    let content = "tok ".repeat(50_000);
    let notes = pipeline.generate(&content, "Huge doc").await.unwrap();

    assert!(notes.truncated);
    assert!(notes.model.contains("chunks=24"));
    // Twenty-four map calls plus the reduce.
    assert_eq!(model.call_count(), 25);
}

#[tokio::test]
async fn given_input_past_token_ceiling_when_generating_notes_then_rejected_before_any_call() {
    let model = Arc::new(ScriptedModel::new());
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    let content = "tok ".repeat(120_001);
    let error = pipeline.generate(&content, "Too big").await.unwrap_err();

    assert!(matches!(
        error,
        PipelineError::InputTooLarge {
            tokens: 120_001,
            limit: 120_000
        }
    ));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn given_whitespace_only_content_when_generating_notes_then_empty_document_error() {
    let model = Arc::new(ScriptedModel::new());
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    let error = pipeline.generate("   \n\t  ", "Empty").await.unwrap_err();

    assert!(matches!(error, PipelineError::EmptyDocument));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn given_backend_failure_mid_run_when_generating_notes_then_error_propagates() {
    let model = Arc::new(ScriptedModel::new());
    model.push_error("backend down");
    let pipeline = SummaryPipeline::new(Arc::clone(&model), TEST_LABEL);

    let error = pipeline.generate("a short document", "Doc").await.unwrap_err();

    assert!(matches!(error, PipelineError::Generation(_)));
}
