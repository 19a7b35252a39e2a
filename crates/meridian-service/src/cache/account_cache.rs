//! Cache-aside storage for accounts.

use super::{cache_keys, CacheStore};
use meridian_core::{Account, AccountId, MeridianResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Lifetime of every cached account, restarted on each store.
pub const ACCOUNT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Outcome of reading one account slot.
#[derive(Debug)]
enum CacheLookup {
    Hit(Account),
    Miss,
    Corrupt(serde_json::Error),
}

/// Account-shaped view over a [`CacheStore`].
///
/// Entries hold the full [`Account`], password hash included; redaction is
/// the service's job. This type never talks to the store of record.
///
/// Connection failures from the store propagate as `CacheUnavailable`.
/// Payloads that fail to deserialize are reported as a miss.
#[derive(Clone)]
pub struct AccountCache {
    store: Arc<dyn CacheStore>,
}

impl AccountCache {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the cached account, or `None` on a miss or a corrupt entry.
    pub async fn fetch(&self, id: &AccountId) -> MeridianResult<Option<Account>> {
        match self.lookup(id).await? {
            CacheLookup::Hit(account) => Ok(Some(account)),
            CacheLookup::Miss | CacheLookup::Corrupt(_) => Ok(None),
        }
    }

    /// Writes the full account under its key with [`ACCOUNT_CACHE_TTL`].
    pub async fn store(&self, account: &Account) -> MeridianResult<()> {
        let key = cache_keys::account_by_id(&account.id);
        let payload = serde_json::to_string(account)?;
        self.store.set_raw(&key, &payload, ACCOUNT_CACHE_TTL).await
    }

    /// Drops the entry for `id`. Succeeds whether or not it was present.
    pub async fn invalidate(&self, id: &AccountId) -> MeridianResult<()> {
        let key = cache_keys::account_by_id(id);
        let existed = self.store.delete(&key).await?;
        debug!("Invalidated key '{}' (present: {})", key, existed);
        Ok(())
    }

    async fn lookup(&self, id: &AccountId) -> MeridianResult<CacheLookup> {
        let key = cache_keys::account_by_id(id);

        let Some(payload) = self.store.get_raw(&key).await? else {
            debug!("Cache miss for key '{}'", key);
            return Ok(CacheLookup::Miss);
        };

        match serde_json::from_str::<Account>(&payload) {
            Ok(account) => {
                debug!("Cache hit for key '{}'", key);
                Ok(CacheLookup::Hit(account))
            }
            Err(e) => {
                warn!("Discarding corrupt cache entry '{}': {}", key, e);
                Ok(CacheLookup::Corrupt(e))
            }
        }
    }
}

impl std::fmt::Debug for AccountCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountCache")
            .field("ttl", &ACCOUNT_CACHE_TTL)
            .finish_non_exhaustive()
    }
}
