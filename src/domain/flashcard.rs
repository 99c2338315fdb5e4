use serde::Serialize;

/// One term/definition pair parsed out of the flashcard pipeline's
/// consolidated output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}
