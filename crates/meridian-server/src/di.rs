//! Dependency wiring.
//!
//! Every component is constructed explicitly and handed to its consumers as
//! an `Arc<dyn Trait>`. The cache connection is owned here and shared by the
//! account cache and the readiness probe.

use meridian_config::{RedisConfig, SecurityConfig};
use meridian_core::{MeridianError, MeridianResult};
use meridian_repository::AccountRepository;
use meridian_rest::AppState;
use meridian_security::{PasswordHasher, TokenProvider};
use meridian_service::{
    AccountCache, AccountService, AccountServiceImpl, CacheStore, InMemoryCacheStore,
    RedisCacheStore,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Fully wired application components.
#[derive(Clone)]
pub struct AppModule {
    pub account_service: Arc<dyn AccountService>,
    pub cache_store: Arc<dyn CacheStore>,
}

impl AppModule {
    /// State shared with the HTTP handlers.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        AppState::new(self.account_service.clone(), self.cache_store.clone())
    }
}

/// Builder for [`AppModule`].
#[derive(Default)]
pub struct AppModuleBuilder {
    account_repository: Option<Arc<dyn AccountRepository>>,
    cache_store: Option<Arc<dyn CacheStore>>,
    security_config: Option<SecurityConfig>,
}

impl AppModuleBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_account_repository(mut self, repository: Arc<dyn AccountRepository>) -> Self {
        self.account_repository = Some(repository);
        self
    }

    /// Defaults to an in-process store when not set.
    #[must_use]
    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    #[must_use]
    pub fn with_security_config(mut self, config: SecurityConfig) -> Self {
        self.security_config = Some(config);
        self
    }

    /// Wires the service graph.
    pub fn build(self) -> MeridianResult<AppModule> {
        let account_repository = self.account_repository.ok_or_else(|| {
            MeridianError::Configuration("Account repository not configured".to_string())
        })?;
        let security_config = self.security_config.ok_or_else(|| {
            MeridianError::Configuration("Security configuration not provided".to_string())
        })?;
        let cache_store = self
            .cache_store
            .unwrap_or_else(|| Arc::new(InMemoryCacheStore::new()));

        let password_hasher = Arc::new(PasswordHasher::with_cost(security_config.password_hash_cost));
        let token_provider = Arc::new(TokenProvider::new(Arc::new(security_config)));

        let account_service: Arc<dyn AccountService> = Arc::new(AccountServiceImpl::new(
            account_repository,
            AccountCache::new(cache_store.clone()),
            password_hasher,
            token_provider,
        ));

        Ok(AppModule {
            account_service,
            cache_store,
        })
    }
}

/// Creates the cache store selected by configuration.
///
/// With Redis enabled the connection is warmed up here; a failure is logged
/// and the first request that needs the cache retries.
pub async fn create_cache_store(config: &RedisConfig) -> MeridianResult<Arc<dyn CacheStore>> {
    if !config.enabled {
        info!("Redis disabled, using in-process cache");
        return Ok(Arc::new(InMemoryCacheStore::new()));
    }

    let store = RedisCacheStore::new(config)?;
    if let Err(e) = store.connect().await {
        warn!("Redis not reachable at startup, continuing without cache: {}", e);
    }

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::AccountId;
    use meridian_repository::InMemoryAccountRepository;
    use meridian_service::RegisterRequest;

    fn security_config() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "di-test-secret-0123456789abcdefghij".to_string(),
            password_hash_cost: 4,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_build_requires_repository() {
        let result = AppModuleBuilder::new()
            .with_security_config(security_config())
            .build();
        assert!(matches!(result, Err(MeridianError::Configuration(_))));
    }

    #[test]
    fn test_build_requires_security_config() {
        let result = AppModuleBuilder::new()
            .with_account_repository(Arc::new(InMemoryAccountRepository::new()))
            .build();
        assert!(matches!(result, Err(MeridianError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_wired_module_serves_reads_through_cache() {
        let store = Arc::new(InMemoryCacheStore::new());
        let module = AppModuleBuilder::new()
            .with_account_repository(Arc::new(InMemoryAccountRepository::new()))
            .with_cache_store(store.clone())
            .with_security_config(security_config())
            .build()
            .unwrap();

        let auth = module
            .account_service
            .register(RegisterRequest {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();
        let id: AccountId = auth.account.id;

        assert!(module.account_service.get_by_id(&id).await.unwrap().is_some());
        assert_eq!(store.len(), 1);
        assert!(module.app_state().cache_store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_disabled_redis_selects_in_process_store() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };

        let store = create_cache_store(&config).await.unwrap();
        assert!(store.ping().await.is_ok());
    }
}
