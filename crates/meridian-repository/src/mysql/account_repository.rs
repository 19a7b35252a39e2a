//! MySQL account repository implementation.
//!
//! Expects an `accounts` table shaped like:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     id            VARCHAR(64)  NOT NULL PRIMARY KEY,
//!     email         VARCHAR(255) COLLATE utf8mb4_bin NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     first_name    VARCHAR(255) NULL,
//!     last_name     VARCHAR(255) NULL,
//!     is_active     BOOLEAN      NOT NULL DEFAULT TRUE,
//!     created_at    DATETIME(6)  NOT NULL,
//!     updated_at    DATETIME(6)  NOT NULL
//! );
//! ```

use crate::{traits::AccountRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meridian_core::{Account, AccountId, MeridianError, MeridianResult, NewAccount, ProfilePatch};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const SELECT_COLUMNS: &str =
    "SELECT id, email, password_hash, first_name, last_name, is_active, created_at, updated_at FROM accounts";

/// MySQL account repository implementation.
#[derive(Clone)]
pub struct MySqlAccountRepository {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlAccountRepository {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of an account.
#[derive(Debug, FromRow)]
struct AccountRow {
    id: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Self {
            id: AccountId::new(row.id),
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> MeridianResult<Option<Account>> {
        debug!("Finding account by id: {}", id);

        let row = sqlx::query_as::<_, AccountRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.as_str())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Account::from))
    }

    async fn find_by_email(&self, email: &str) -> MeridianResult<Option<Account>> {
        debug!("Finding account by email: {}", email);

        let row = sqlx::query_as::<_, AccountRow>(&format!("{SELECT_COLUMNS} WHERE email = ?"))
            .bind(email)
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Account::from))
    }

    async fn create(&self, account: NewAccount) -> MeridianResult<Account> {
        let account = account.into_account();
        debug!("Creating account: {}", account.id);

        sqlx::query(
            r#"
            INSERT INTO accounts
                (id, email, password_hash, first_name, last_name, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.as_str())
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.is_active)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(self.pool.inner())
        .await?;

        Ok(account)
    }

    async fn update(&self, id: &AccountId, patch: &ProfilePatch) -> MeridianResult<Account> {
        debug!("Updating account: {}", id);

        // NULL binds keep the column; only `Set` fields are written
        sqlx::query(
            r#"
            UPDATE accounts
            SET first_name = COALESCE(?, first_name),
                last_name  = COALESCE(?, last_name),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.first_name.as_set())
        .bind(patch.last_name.as_set())
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| MeridianError::not_found("Account", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_every_column() {
        let now = Utc::now();
        let row = AccountRow {
            id: "acc-1".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let account = Account::from(row);

        assert_eq!(account.id, AccountId::new("acc-1"));
        assert_eq!(account.email, "a@x.com");
        assert_eq!(account.password_hash, "$argon2id$hash");
        assert_eq!(account.first_name.as_deref(), Some("Ada"));
        assert!(account.last_name.is_none());
        assert!(account.is_active);
    }
}
