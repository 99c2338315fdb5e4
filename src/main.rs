use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use kuching::application::ports::LanguageModel;
use kuching::application::services::{
    ChatPipeline, FlashcardPipeline, QuizPipeline, SummaryPipeline,
};
use kuching::infrastructure::cache::MemoryCache;
use kuching::infrastructure::llm::{LmStudioClient, MockLanguageModel};
use kuching::infrastructure::observability::{TracingConfig, init_tracing};
use kuching::infrastructure::text_processing::CompositeFileLoader;
use kuching::presentation::{AppState, Environment, ScaffoldConfig, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    init_tracing(TracingConfig::default());

    let settings = Settings::load(environment)?;
    let scaffold = ScaffoldConfig::from_env();

    let router = if scaffold.enabled {
        tracing::warn!(
            delay_ms = scaffold.mock_response_delay_ms,
            "Scaffold mode enabled, serving the echoing mock backend"
        );
        let model = Arc::new(MockLanguageModel::new(scaffold.mock_response_delay_ms));
        build_router(model, &settings)
    } else {
        let model = Arc::new(LmStudioClient::new(
            &settings.backend.base_url,
            settings.backend.api_key.clone(),
            settings.backend.model.clone(),
        ));
        build_router(model, &settings)
    };

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!(environment = %environment, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn build_router<M>(model: Arc<M>, settings: &Settings) -> axum::Router
where
    M: LanguageModel + 'static,
{
    let label = settings.backend.label.clone();
    let state = AppState {
        summary_pipeline: Arc::new(SummaryPipeline::new(Arc::clone(&model), label.clone())),
        quiz_pipeline: Arc::new(QuizPipeline::new(Arc::clone(&model), label.clone())),
        flashcard_pipeline: Arc::new(FlashcardPipeline::new(Arc::clone(&model), label.clone())),
        chat_pipeline: Arc::new(ChatPipeline::new(
            model,
            label,
            settings.chat.system_prompt.clone(),
        )),
        file_loader: Arc::new(CompositeFileLoader::with_defaults()),
        artifact_cache: Arc::new(MemoryCache::new(settings.cache.max_entries)),
        settings: settings.clone(),
    };

    create_router(state)
}
