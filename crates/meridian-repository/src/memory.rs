//! Process-local account store.

use crate::AccountRepository;
use async_trait::async_trait;
use meridian_core::{Account, AccountId, MeridianError, MeridianResult, NewAccount, ProfilePatch};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Account store held in memory, with the same uniqueness rules as MySQL.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing accounts.
    #[must_use]
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let map = accounts.into_iter().map(|a| (a.id.clone(), a)).collect();
        Self {
            accounts: RwLock::new(map),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> MeridianResult<Option<Account>> {
        Ok(self.accounts.read().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> MeridianResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create(&self, account: NewAccount) -> MeridianResult<Account> {
        let mut accounts = self.accounts.write();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(MeridianError::EmailAlreadyExists(account.email));
        }

        let account = account.into_account();
        accounts.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    async fn update(&self, id: &AccountId, patch: &ProfilePatch) -> MeridianResult<Account> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(id)
            .ok_or_else(|| MeridianError::not_found("Account", id))?;

        account.apply_patch(patch);
        Ok(account.clone())
    }
}
