use std::time::Duration;

use async_trait::async_trait;

/// Pass-through cache for finished artifacts, keyed by a content hash.
/// Intentionally advisory: a miss and a broken cache look the same, and a
/// failed write must never fail the generation request it rode along with.
#[async_trait]
pub trait ArtifactCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn put(&self, key: &str, value: String, ttl: Duration);
}
