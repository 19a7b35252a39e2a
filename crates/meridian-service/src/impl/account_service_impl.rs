//! Account service implementation.

use crate::account_service::AccountService;
use crate::cache::AccountCache;
use crate::dto::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
use async_trait::async_trait;
use meridian_core::{
    Account, AccountId, MeridianError, MeridianResult, NewAccount, ProfilePatch, ValidateExt,
};
use meridian_repository::AccountRepository;
use meridian_security::{PasswordHasherInterface, SessionClaims, TokenProviderInterface};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Plaintext behind the decoy hash checked when a login names no account.
const DECOY_PASSWORD: &str = "meridian-decoy-password";

/// Account service over a store of record and an account cache.
///
/// Cache failures never fail a request. Reads fall back to the repository and
/// a failed invalidation after a successful write is logged; the stale entry
/// still expires with its TTL.
pub struct AccountServiceImpl {
    account_repository: Arc<dyn AccountRepository>,
    account_cache: AccountCache,
    password_hasher: Arc<dyn PasswordHasherInterface>,
    token_provider: Arc<dyn TokenProviderInterface>,
    decoy_hash: OnceCell<String>,
}

impl AccountServiceImpl {
    #[must_use]
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        account_cache: AccountCache,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
    ) -> Self {
        Self {
            account_repository,
            account_cache,
            password_hasher,
            token_provider,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Runs one password verification for a login that matched no account,
    /// so both credential failures pay the same hashing cost.
    async fn verify_against_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| async { self.password_hasher.hash(DECOY_PASSWORD) })
            .await;

        match decoy {
            Ok(hash) => {
                if let Err(e) = self.password_hasher.verify(password, hash) {
                    warn!("Decoy password check failed: {}", e);
                }
            }
            Err(e) => warn!("Failed to prepare decoy hash: {}", e),
        }
    }

    async fn load(&self, id: &AccountId) -> MeridianResult<Option<Account>> {
        match self.account_cache.fetch(id).await {
            Ok(Some(account)) => return Ok(Some(account)),
            Ok(None) => {}
            Err(e) => warn!("Cache read failed for account {}, using repository: {}", id, e),
        }

        let Some(account) = self.account_repository.find_by_id(id).await? else {
            return Ok(None);
        };

        if let Err(e) = self.account_cache.store(&account).await {
            warn!("Failed to populate cache for account {}: {}", id, e);
        }

        Ok(Some(account))
    }

    fn issue_for(&self, account: Account) -> MeridianResult<AuthResponse> {
        let issued = self.token_provider.issue(&account.id, &account.email)?;
        Ok(AuthResponse::bearer(
            AccountResponse::from(account),
            issued.token,
            issued.expires_in,
        ))
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, request: RegisterRequest) -> MeridianResult<AuthResponse> {
        debug!("Registering account: {}", request.email);

        request.validate_request()?;

        if self
            .account_repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(MeridianError::EmailAlreadyExists(request.email));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let email = request.email.clone();

        // A concurrent registration can still win the unique index.
        let account = self
            .account_repository
            .create(NewAccount {
                email: request.email,
                password_hash,
                first_name: request.first_name,
                last_name: request.last_name,
            })
            .await
            .map_err(|e| match e {
                MeridianError::EmailAlreadyExists(_) => MeridianError::EmailAlreadyExists(email),
                other => other,
            })?;

        info!("Account registered: {}", account.id);
        self.issue_for(account)
    }

    async fn authenticate(&self, request: LoginRequest) -> MeridianResult<AuthResponse> {
        debug!("Authenticating account: {}", request.email);

        let Some(account) = self.account_repository.find_by_email(&request.email).await? else {
            self.verify_against_decoy(&request.password).await;
            warn!("Login failed: unknown email");
            return Err(MeridianError::InvalidCredentials);
        };

        if !self
            .password_hasher
            .verify(&request.password, &account.password_hash)?
        {
            warn!("Login failed: wrong password for account {}", account.id);
            return Err(MeridianError::InvalidCredentials);
        }

        info!("Account authenticated: {}", account.id);
        self.issue_for(account)
    }

    async fn get_by_id(&self, id: &AccountId) -> MeridianResult<Option<AccountResponse>> {
        Ok(self.load(id).await?.map(AccountResponse::from))
    }

    async fn get_by_id_raw(&self, id: &AccountId) -> MeridianResult<Option<Account>> {
        self.load(id).await
    }

    async fn update_profile(
        &self,
        id: &AccountId,
        patch: ProfilePatch,
    ) -> MeridianResult<AccountResponse> {
        debug!("Updating profile: {}", id);

        let account = self.account_repository.update(id, &patch).await?;

        if let Err(e) = self.account_cache.invalidate(id).await {
            warn!("Failed to invalidate cache for account {}: {}", id, e);
        }

        info!("Profile updated: {}", id);
        Ok(AccountResponse::from(account))
    }

    fn verify_token(&self, token: &str) -> MeridianResult<SessionClaims> {
        self.token_provider.verify(token)
    }
}

impl std::fmt::Debug for AccountServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{cache_keys, CacheStore, InMemoryCacheStore, ACCOUNT_CACHE_TTL};
    use meridian_config::SecurityConfig;
    use meridian_security::{PasswordHasher, TokenProvider};
    use mockall::mock;
    use mockall::predicate::always;
    use std::time::Duration;

    mock! {
        pub Repository {}

        #[async_trait]
        impl AccountRepository for Repository {
            async fn find_by_id(&self, id: &AccountId) -> MeridianResult<Option<Account>>;
            async fn find_by_email(&self, email: &str) -> MeridianResult<Option<Account>>;
            async fn create(&self, account: NewAccount) -> MeridianResult<Account>;
            async fn update(&self, id: &AccountId, patch: &ProfilePatch) -> MeridianResult<Account>;
        }
    }

    /// Store whose every operation fails as if Redis were down.
    struct UnavailableStore;

    #[async_trait]
    impl CacheStore for UnavailableStore {
        async fn get_raw(&self, _key: &str) -> MeridianResult<Option<String>> {
            Err(MeridianError::cache_unavailable("connection refused"))
        }

        async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> MeridianResult<()> {
            Err(MeridianError::cache_unavailable("connection refused"))
        }

        async fn delete(&self, _key: &str) -> MeridianResult<bool> {
            Err(MeridianError::cache_unavailable("connection refused"))
        }

        async fn ping(&self) -> MeridianResult<()> {
            Err(MeridianError::cache_unavailable("connection refused"))
        }
    }

    fn test_account() -> Account {
        NewAccount {
            email: "a@x.com".to_string(),
            password_hash: "stored-hash".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
        .into_account()
    }

    fn service(repo: MockRepository, store: Arc<dyn CacheStore>) -> AccountServiceImpl {
        let config = SecurityConfig {
            jwt_secret: "unit-test-secret-with-at-least-32-chars".to_string(),
            ..SecurityConfig::default()
        };
        AccountServiceImpl::new(
            Arc::new(repo),
            AccountCache::new(store),
            Arc::new(PasswordHasher::with_cost(1)),
            Arc::new(TokenProvider::new(Arc::new(config))),
        )
    }

    #[tokio::test]
    async fn test_cache_hit_never_touches_repository() {
        let account = test_account();
        let store = Arc::new(InMemoryCacheStore::new());
        store
            .set_raw(
                &cache_keys::account_by_id(&account.id),
                &serde_json::to_string(&account).unwrap(),
                ACCOUNT_CACHE_TTL,
            )
            .await
            .unwrap();

        let mut repo = MockRepository::new();
        repo.expect_find_by_id().never();

        let service = service(repo, store);
        let found = service.get_by_id(&account.id).await.unwrap().unwrap();

        assert_eq!(found, AccountResponse::from(account));
    }

    #[tokio::test]
    async fn test_miss_populates_cache() {
        let account = test_account();
        let returned = account.clone();
        let store = Arc::new(InMemoryCacheStore::new());

        let mut repo = MockRepository::new();
        repo.expect_find_by_id()
            .with(always())
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = service(repo, store.clone());

        service.get_by_id(&account.id).await.unwrap();
        // served from cache; a second repository call would violate times(1)
        service.get_by_id(&account.id).await.unwrap();

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_account_is_not_cached() {
        let store = Arc::new(InMemoryCacheStore::new());
        let mut repo = MockRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = service(repo, store.clone());

        assert!(service
            .get_by_id(&AccountId::new("missing"))
            .await
            .unwrap()
            .is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_read_falls_back_when_cache_unavailable() {
        let account = test_account();
        let returned = account.clone();

        let mut repo = MockRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(returned.clone())));

        let service = service(repo, Arc::new(UnavailableStore));
        let found = service.get_by_id_raw(&account.id).await.unwrap();

        assert_eq!(found, Some(account));
    }

    #[tokio::test]
    async fn test_update_succeeds_when_invalidation_fails() {
        let mut account = test_account();
        account.first_name = Some("Grace".to_string());
        let returned = account.clone();

        let mut repo = MockRepository::new();
        repo.expect_update()
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let service = service(repo, Arc::new(UnavailableStore));
        let patch = ProfilePatch::new(Some("Grace".to_string()), None);
        let updated = service.update_profile(&account.id, patch).await.unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Grace"));
    }

    #[tokio::test]
    async fn test_update_never_writes_cache() {
        let account = test_account();
        let returned = account.clone();
        let store = Arc::new(InMemoryCacheStore::new());

        let mut repo = MockRepository::new();
        repo.expect_update()
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let service = service(repo, store.clone());
        let patch = ProfilePatch::new(None, Some("Hopper".to_string()));
        service.update_profile(&account.id, patch).await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_register_checks_email_before_hashing() {
        let mut repo = MockRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(test_account())));
        repo.expect_create().never();

        let service = service(repo, Arc::new(InMemoryCacheStore::new()));
        let err = service
            .register(RegisterRequest {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MeridianError::EmailAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_before_lookup() {
        let mut repo = MockRepository::new();
        repo.expect_find_by_email().never();

        let service = service(repo, Arc::new(InMemoryCacheStore::new()));
        let err = service
            .register(RegisterRequest {
                email: "nope".to_string(),
                password: "pw".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, MeridianError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_token_round_trips_issued_token() {
        let mut repo = MockRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|new_account| Ok(new_account.into_account()));

        let service = service(repo, Arc::new(InMemoryCacheStore::new()));
        let auth = service
            .register(RegisterRequest {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap();

        let claims = service.verify_token(&auth.token).unwrap();
        assert_eq!(claims.account_id(), auth.account.id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(auth.token_type, "Bearer");
    }

    /// Hasher that counts verifications.
    struct CountingHasher {
        inner: PasswordHasher,
        verifications: std::sync::atomic::AtomicUsize,
    }

    impl PasswordHasherInterface for CountingHasher {
        fn hash(&self, password: &str) -> MeridianResult<String> {
            self.inner.hash(password)
        }

        fn verify(&self, password: &str, hash: &str) -> MeridianResult<bool> {
            self.verifications
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.inner.verify(password, hash)
        }
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_password() {
        let mut repo = MockRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let hasher = Arc::new(CountingHasher {
            inner: PasswordHasher::with_cost(1),
            verifications: std::sync::atomic::AtomicUsize::new(0),
        });
        let config = SecurityConfig {
            jwt_secret: "unit-test-secret-with-at-least-32-chars".to_string(),
            ..SecurityConfig::default()
        };
        let service = AccountServiceImpl::new(
            Arc::new(repo),
            AccountCache::new(Arc::new(InMemoryCacheStore::new())),
            hasher.clone(),
            Arc::new(TokenProvider::new(Arc::new(config))),
        );

        for _ in 0..2 {
            let err = service
                .authenticate(LoginRequest {
                    email: "ghost@x.com".to_string(),
                    password: "pw".to_string(),
                })
                .await
                .unwrap_err();
            assert!(matches!(err, MeridianError::InvalidCredentials));
        }

        assert_eq!(
            hasher.verifications.load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }

    #[tokio::test]
    async fn test_lost_registration_race_reports_the_email() {
        let mut repo = MockRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().returning(|_| {
            Err(MeridianError::EmailAlreadyExists(
                "Duplicate entry 'a@x.com' for key 'accounts.email'".to_string(),
            ))
        });

        let service = service(repo, Arc::new(InMemoryCacheStore::new()));
        let err = service
            .register(RegisterRequest {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap_err();

        match err {
            MeridianError::EmailAlreadyExists(email) => assert_eq!(email, "a@x.com"),
            other => panic!("Expected EmailAlreadyExists, got {:?}", other),
        }
    }
}
