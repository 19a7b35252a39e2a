//! In-process cache store.

use super::CacheStore;
use async_trait::async_trait;
use meridian_core::MeridianResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Process-local store with per-entry expiry.
///
/// Used when Redis is disabled. Expiry is read from the tokio clock so tests
/// can drive it with a paused runtime.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get_raw(&self, key: &str) -> MeridianResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Also drops every expired entry, so keys that are never read again
    /// do not accumulate.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> MeridianResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> MeridianResult<bool> {
        let removed = self.entries.lock().remove(key);
        Ok(matches!(removed, Some((_, expires_at)) if expires_at > Instant::now()))
    }

    async fn ping(&self) -> MeridianResult<()> {
        Ok(())
    }
}
