use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::LanguageModel;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    chat_handler, chat_stream_handler, flashcards_handler, health_handler, quiz_handler,
    summary_handler, upload_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<M>(state: AppState<M>) -> Router
where
    M: LanguageModel + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Uploads are the largest accepted bodies; leave headroom for the
    // multipart framing around the file itself.
    let body_limit =
        DefaultBodyLimit::max(state.settings.upload.max_file_size_mb * 1024 * 1024 + 64 * 1024);

    Router::new()
        .route("/health", get(health_handler::<M>))
        .route("/generate/summary", post(summary_handler::<M>))
        .route("/generate/quiz", post(quiz_handler::<M>))
        .route("/generate/flashcards", post(flashcards_handler::<M>))
        .route("/upload/document", post(upload_handler::<M>))
        .route("/chat", post(chat_handler::<M>))
        .route("/chat/stream", post(chat_stream_handler::<M>))
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
