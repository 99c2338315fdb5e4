mod cache_key;
mod chat;
mod flashcards;
mod health;
mod quiz;
pub mod responses;
mod summary;
mod upload;

pub use chat::{chat_handler, chat_stream_handler};
pub use flashcards::flashcards_handler;
pub use health::health_handler;
pub use quiz::quiz_handler;
pub use summary::summary_handler;
pub use upload::upload_handler;
