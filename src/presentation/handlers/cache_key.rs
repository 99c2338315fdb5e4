use sha2::{Digest, Sha256};

/// Cache key for one generated artifact. Task and title are hashed along
/// with the content; a NUL between fields keeps `("ab", "c")` and
/// `("a", "bc")` from colliding.
pub(super) fn artifact_cache_key(task: &str, title: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(task.as_bytes());
    hasher.update([0u8]);
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(content.as_bytes());
    format!("{}:{:x}", task, hasher.finalize())
}
