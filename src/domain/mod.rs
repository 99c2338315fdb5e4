mod document;
mod flashcard;
mod message;
mod message_role;

pub use document::{ContentType, Document, DocumentId};
pub use flashcard::Flashcard;
pub use message::ChatMessage;
pub use message_role::MessageRole;
