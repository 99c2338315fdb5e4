use std::sync::Arc;

use crate::application::ports::{ArtifactCache, FileLoader, LanguageModel};
use crate::application::services::{
    ChatPipeline, FlashcardPipeline, QuizPipeline, SummaryPipeline,
};
use crate::presentation::config::Settings;

/// Shared handler state. Generic over the backend so the same router serves
/// a real model server or the offline mock.
pub struct AppState<M>
where
    M: LanguageModel,
{
    pub summary_pipeline: Arc<SummaryPipeline<M>>,
    pub quiz_pipeline: Arc<QuizPipeline<M>>,
    pub flashcard_pipeline: Arc<FlashcardPipeline<M>>,
    pub chat_pipeline: Arc<ChatPipeline<M>>,
    pub file_loader: Arc<dyn FileLoader>,
    pub artifact_cache: Arc<dyn ArtifactCache>,
    pub settings: Settings,
}

impl<M> Clone for AppState<M>
where
    M: LanguageModel,
{
    fn clone(&self) -> Self {
        Self {
            summary_pipeline: Arc::clone(&self.summary_pipeline),
            quiz_pipeline: Arc::clone(&self.quiz_pipeline),
            flashcard_pipeline: Arc::clone(&self.flashcard_pipeline),
            chat_pipeline: Arc::clone(&self.chat_pipeline),
            file_loader: Arc::clone(&self.file_loader),
            artifact_cache: Arc::clone(&self.artifact_cache),
            settings: self.settings.clone(),
        }
    }
}
