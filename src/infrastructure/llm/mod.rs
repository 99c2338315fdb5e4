mod lm_studio_client;
mod mock_model;
mod tokenizer;

pub use lm_studio_client::LmStudioClient;
pub use mock_model::MockLanguageModel;
