use kuching::application::services::{
    GenerationBudget, ItemTargets, assessment_chunking, flashcard_targets, quiz_targets,
    summary_budget, summary_chunking,
};

#[test]
fn given_document_sizes_when_selecting_summary_window_then_band_edges_are_inclusive() {
    assert_eq!(summary_chunking(0).window, 1_000);
    assert_eq!(summary_chunking(2_000).window, 1_000);
    assert_eq!(summary_chunking(2_000).overlap, 60);
    assert_eq!(summary_chunking(2_001).window, 1_600);
    assert_eq!(summary_chunking(8_000).window, 1_600);
    assert_eq!(summary_chunking(8_000).overlap, 100);
    assert_eq!(summary_chunking(8_001).window, 1_900);
    assert_eq!(summary_chunking(20_000).window, 1_900);
    assert_eq!(summary_chunking(20_000).overlap, 140);
    assert_eq!(summary_chunking(20_001).window, 2_100);
    assert_eq!(summary_chunking(500_000).overlap, 160);
}

#[test]
fn given_chunk_counts_when_selecting_summary_budget_then_budget_shrinks_with_count() {
    assert_eq!(
        summary_budget(1),
        GenerationBudget {
            map_tokens: 120,
            reduce_tokens: 700
        }
    );
    assert_eq!(
        summary_budget(4),
        GenerationBudget {
            map_tokens: 120,
            reduce_tokens: 700
        }
    );
    assert_eq!(
        summary_budget(5),
        GenerationBudget {
            map_tokens: 100,
            reduce_tokens: 600
        }
    );
    assert_eq!(
        summary_budget(10),
        GenerationBudget {
            map_tokens: 100,
            reduce_tokens: 600
        }
    );
    assert_eq!(
        summary_budget(11),
        GenerationBudget {
            map_tokens: 80,
            reduce_tokens: 500
        }
    );
    assert_eq!(
        summary_budget(16),
        GenerationBudget {
            map_tokens: 80,
            reduce_tokens: 500
        }
    );
    assert_eq!(
        summary_budget(17),
        GenerationBudget {
            map_tokens: 60,
            reduce_tokens: 400
        }
    );
}

#[test]
fn given_document_sizes_when_selecting_assessment_window_then_windows_run_wider_than_summary() {
    assert_eq!(assessment_chunking(2_000).window, 1_400);
    assert_eq!(assessment_chunking(2_000).overlap, 80);
    assert_eq!(assessment_chunking(2_001).window, 1_900);
    assert_eq!(assessment_chunking(8_000).overlap, 120);
    assert_eq!(assessment_chunking(8_001).window, 2_200);
    assert_eq!(assessment_chunking(20_000).overlap, 150);
    assert_eq!(assessment_chunking(20_001).window, 2_400);
    assert_eq!(assessment_chunking(20_001).overlap, 180);

    for tokens in [1_000, 5_000, 15_000, 60_000] {
        assert!(assessment_chunking(tokens).window > summary_chunking(tokens).window);
    }
}

#[test]
fn given_short_document_when_sizing_quiz_then_target_clamps_to_floor() {
    assert_eq!(
        quiz_targets(0, 1),
        ItemTargets {
            total: 12,
            per_chunk: 6
        }
    );
    assert_eq!(quiz_targets(4_999, 1).total, 12);
}

#[test]
fn given_long_document_when_sizing_quiz_then_target_clamps_to_ceiling() {
    assert_eq!(quiz_targets(50_000, 20).total, 30);
    assert_eq!(quiz_targets(120_000, 20).total, 30);
}

#[test]
fn given_midsize_document_when_sizing_quiz_then_target_scales_with_tokens() {
    // 25_000 / 2_500 + 10 questions.
    assert_eq!(quiz_targets(25_000, 10).total, 20);
    assert_eq!(quiz_targets(25_000, 10).per_chunk, 3);
}

#[test]
fn given_many_chunks_when_sizing_quiz_then_per_chunk_count_stays_in_band() {
    assert_eq!(quiz_targets(50_000, 20).per_chunk, 3);
    assert_eq!(quiz_targets(0, 1).per_chunk, 6);
    // Division by zero is not a concern even for a degenerate chunk count.
    assert_eq!(quiz_targets(1_000, 0).per_chunk, 6);
}

#[test]
fn given_short_document_when_sizing_flashcards_then_target_clamps_to_floor() {
    assert_eq!(
        flashcard_targets(0, 1),
        ItemTargets {
            total: 15,
            per_chunk: 7
        }
    );
}

#[test]
fn given_long_document_when_sizing_flashcards_then_target_clamps_to_ceiling() {
    assert_eq!(flashcard_targets(40_000, 20).total, 35);
    assert_eq!(flashcard_targets(40_000, 20).per_chunk, 4);
}

#[test]
fn given_midsize_document_when_sizing_flashcards_then_target_scales_with_tokens() {
    // 20_000 / 2_000 + 15 cards.
    assert_eq!(flashcard_targets(20_000, 5).total, 25);
    assert_eq!(flashcard_targets(20_000, 5).per_chunk, 5);
}
