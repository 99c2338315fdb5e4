mod artifact_cache;
mod file_loader;
mod language_model;

pub use artifact_cache::ArtifactCache;
pub use file_loader::{FileLoader, FileLoaderError};
pub use language_model::{LanguageModel, LanguageModelError, TokenStream};
