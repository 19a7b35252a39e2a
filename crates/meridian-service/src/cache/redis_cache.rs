//! Redis-backed cache store.

use super::CacheStore;
use async_trait::async_trait;
use meridian_config::RedisConfig;
use meridian_core::{MeridianError, MeridianResult};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

/// Redis cache store with a lazily established, shared connection.
///
/// The connection is opened by the first operation that needs it and reused
/// afterwards. A failed attempt leaves nothing memoized, so the next
/// operation tries again. `ConnectionManager` reconnects on its own once a
/// connection has been established.
pub struct RedisCacheStore {
    client: Client,
    connection: OnceCell<ConnectionManager>,
    connect_timeout: Duration,
    operation_timeout: Duration,
}

impl RedisCacheStore {
    /// Creates the store without touching the network.
    ///
    /// Fails only when the URL cannot be parsed.
    pub fn new(config: &RedisConfig) -> MeridianResult<Self> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| MeridianError::Configuration(format!("Invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            connect_timeout: config.connect_timeout(),
            operation_timeout: config.operation_timeout(),
        })
    }

    /// Establishes the connection ahead of the first request.
    ///
    /// Callers at startup log the failure and carry on; later operations retry.
    pub async fn connect(&self) -> MeridianResult<()> {
        self.connection().await.map(|_| ())
    }

    /// Returns true once a connection has been established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    async fn connection(&self) -> MeridianResult<ConnectionManager> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                let attempt = tokio::time::timeout(
                    self.connect_timeout,
                    self.client.get_connection_manager(),
                )
                .await;

                match attempt {
                    Ok(Ok(manager)) => {
                        info!("Connected to Redis");
                        Ok(manager)
                    }
                    Ok(Err(e)) => {
                        error!("Redis connection error: {}", e);
                        Err(MeridianError::cache_unavailable(format!(
                            "Failed to connect to Redis: {}",
                            e
                        )))
                    }
                    Err(_) => {
                        error!(
                            "Redis connection timed out after {}ms",
                            self.connect_timeout.as_millis()
                        );
                        Err(MeridianError::cache_unavailable("Redis connection timed out"))
                    }
                }
            })
            .await?;

        Ok(manager.clone())
    }

    /// Runs one command under the operation timeout.
    async fn run<T, F>(&self, op: &str, key: &str, command: F) -> MeridianResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        match tokio::time::timeout(self.operation_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("Redis {} failed for key '{}': {}", op, key, e);
                Err(MeridianError::cache_unavailable(format!(
                    "Redis {} failed: {}",
                    op, e
                )))
            }
            Err(_) => {
                warn!("Redis {} timed out for key '{}'", op, key);
                Err(MeridianError::cache_unavailable(format!(
                    "Redis {} timed out",
                    op
                )))
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get_raw(&self, key: &str) -> MeridianResult<Option<String>> {
        let mut conn = self.connection().await?;
        self.run("GET", key, conn.get::<_, Option<String>>(key)).await
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> MeridianResult<()> {
        let mut conn = self.connection().await?;
        let ttl_secs = ttl.as_secs().max(1);

        self.run("SETEX", key, conn.set_ex::<_, _, ()>(key, value, ttl_secs))
            .await?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> MeridianResult<bool> {
        let mut conn = self.connection().await?;
        let deleted = self.run("DEL", key, conn.del::<_, i64>(key)).await?;
        Ok(deleted > 0)
    }

    async fn ping(&self) -> MeridianResult<()> {
        let mut conn = self.connection().await?;
        let pong: String = self
            .run("PING", "-", redis::cmd("PING").query_async(&mut conn))
            .await?;
        debug!("Redis answered {}", pong);
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("connected", &self.is_connected())
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> RedisConfig {
        RedisConfig {
            url: url.to_string(),
            connect_timeout_ms: 200,
            operation_timeout_ms: 200,
            ..RedisConfig::default()
        }
    }

    #[test]
    fn test_new_does_not_connect() {
        let store = RedisCacheStore::new(&config("redis://127.0.0.1:6379/0")).unwrap();
        assert!(!store.is_connected());
    }

    #[test]
    fn test_rejects_malformed_url() {
        let result = RedisCacheStore::new(&config("not-a-redis-url"));
        assert!(matches!(result, Err(MeridianError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server_surfaces_cache_unavailable() {
        // Port 1 is reserved and refuses connections.
        let store = RedisCacheStore::new(&config("redis://127.0.0.1:1/0")).unwrap();

        let err = store.get_raw("account:x").await.unwrap_err();
        assert!(matches!(err, MeridianError::CacheUnavailable(_)));
        assert!(!store.is_connected());

        // the failure is not memoized; the next operation tries again
        let err = store.delete("account:x").await.unwrap_err();
        assert!(matches!(err, MeridianError::CacheUnavailable(_)));
    }
}
