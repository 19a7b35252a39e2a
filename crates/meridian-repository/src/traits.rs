//! Repository trait definitions.

use async_trait::async_trait;
use meridian_core::{Account, AccountId, MeridianResult, NewAccount, ProfilePatch};

/// Store of record for accounts.
///
/// Implementations know nothing about caching. Email uniqueness is enforced
/// here: `create` fails with `EmailAlreadyExists` when the email is taken.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by ID.
    async fn find_by_id(&self, id: &AccountId) -> MeridianResult<Option<Account>>;

    /// Finds an account by its exact email.
    async fn find_by_email(&self, email: &str) -> MeridianResult<Option<Account>>;

    /// Persists a new account and returns it with its assigned identity.
    async fn create(&self, account: NewAccount) -> MeridianResult<Account>;

    /// Applies a profile patch and returns the stored result.
    ///
    /// Fails with `NotFound` when no account has this ID.
    async fn update(&self, id: &AccountId, patch: &ProfilePatch) -> MeridianResult<Account>;
}
