use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::RecipeId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Ingredient search; the ingredient list is normalized so order and case don't matter
    RecipeSearch(Vec<String>),
    RecipeDetails(RecipeId),
    CuisineClassification(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::RecipeSearch(ingredients) => {
                let mut normalized: Vec<String> = ingredients
                    .iter()
                    .map(|i| i.trim().to_lowercase())
                    .filter(|i| !i.is_empty())
                    .collect();
                normalized.sort();
                normalized.dedup();
                write!(f, "search:{}", normalized.join(","))
            }
            CacheKey::RecipeDetails(id) => write!(f, "details:{}", id),
            CacheKey::CuisineClassification(title) => {
                write!(f, "cuisine:{}", title.trim().to_lowercase())
            }
        }
    }
}

/// Creates a Redis client for caching
///
/// The client connects lazily, so an unreachable server only surfaces
/// on the first cache operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for recipe API responses stored in Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a new Cache and spawns its background writer task
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Background task that drains write messages into Redis
    ///
    /// On shutdown every message already queued is flushed before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::warn!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!(failed_writes, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value
    ///
    /// Returns `Ok(None)` on a miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Like [`Cache::get_from_cache`], but any cache failure counts as a miss
    ///
    /// Recipe lookups must keep working while Redis is down.
    pub async fn get_or_miss<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.get_from_cache(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Queues a value for writing without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_search_is_order_and_case_insensitive() {
        let a = CacheKey::RecipeSearch(vec!["Tomato".into(), "basil".into()]);
        let b = CacheKey::RecipeSearch(vec![" basil".into(), "tomato".into()]);
        assert_eq!(a.to_string(), "search:basil,tomato");
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_cache_key_search_drops_blanks_and_duplicates() {
        let key = CacheKey::RecipeSearch(vec!["Egg".into(), "".into(), "egg".into()]);
        assert_eq!(key.to_string(), "search:egg");
    }

    #[test]
    fn test_cache_key_details() {
        let key = CacheKey::RecipeDetails(RecipeId(715538));
        assert_eq!(key.to_string(), "details:715538");
    }

    #[test]
    fn test_cache_key_cuisine() {
        let key = CacheKey::CuisineClassification("Pad Thai ".into());
        assert_eq!(key.to_string(), "cuisine:pad thai");
    }

    #[tokio::test]
    async fn test_unreachable_redis_reads_as_miss() {
        // Nothing listens on port 1
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client);

        let key = CacheKey::RecipeDetails(RecipeId(1));
        let value: Option<Vec<String>> = cache.get_or_miss(&key).await;
        assert_eq!(value, None);

        cache.set_in_background(&key, &vec!["ignored".to_string()], 60);
        handle.shutdown().await;
    }
}
