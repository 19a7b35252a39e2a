//! Account service trait definition.

use crate::dto::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
use async_trait::async_trait;
use meridian_core::{Account, AccountId, MeridianResult, ProfilePatch};
use meridian_security::SessionClaims;

/// Account use cases.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Registers a new account and issues a session token.
    ///
    /// Fails with `EmailAlreadyExists` when the email is taken. The cache is
    /// left alone; the first read populates it.
    async fn register(&self, request: RegisterRequest) -> MeridianResult<AuthResponse>;

    /// Verifies credentials against the store of record and issues a token.
    ///
    /// An unknown email and a wrong password fail with the same
    /// `InvalidCredentials`.
    async fn authenticate(&self, request: LoginRequest) -> MeridianResult<AuthResponse>;

    /// Cache-aside read returning the safe view.
    async fn get_by_id(&self, id: &AccountId) -> MeridianResult<Option<AccountResponse>>;

    /// Cache-aside read returning the full entity, hash included.
    async fn get_by_id_raw(&self, id: &AccountId) -> MeridianResult<Option<Account>>;

    /// Writes the patch to the store of record, then invalidates the cache entry.
    async fn update_profile(
        &self,
        id: &AccountId,
        patch: ProfilePatch,
    ) -> MeridianResult<AccountResponse>;

    /// Validates a bearer token and returns its claims.
    fn verify_token(&self, token: &str) -> MeridianResult<SessionClaims>;
}
