//! Cache store trait for raw key/value access.

use async_trait::async_trait;
use meridian_core::MeridianResult;
use std::time::Duration;

/// String key/value store with expiry.
///
/// Connection and command failures are reported as `CacheUnavailable`.
/// A missing key is never an error.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a raw value.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> MeridianResult<Option<String>>;

    /// Set a raw value, overwriting any previous one and restarting its TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> MeridianResult<()>;

    /// Delete a value.
    ///
    /// Returns `true` if the key existed. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> MeridianResult<bool>;

    /// Round-trips to the backing store.
    async fn ping(&self) -> MeridianResult<()>;
}
