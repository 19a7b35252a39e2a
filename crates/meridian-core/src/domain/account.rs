//! Account entity.

use super::patch::ProfilePatch;
use crate::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as held by the store of record.
///
/// This is the authoritative shape. It serializes every field, including the
/// password hash, so it must never be handed to an outward-facing response
/// directly. Responses go through a safe view instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique across accounts, compared exactly as stored.
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Applies a profile patch and bumps `updated_at`.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        patch.first_name.apply_to(&mut self.first_name);
        patch.last_name.apply_to(&mut self.last_name);
        self.updated_at = Utc::now();
    }
}

/// Fields supplied when creating an account.
///
/// The identifier and timestamps are assigned by [`NewAccount::into_account`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl NewAccount {
    /// Materializes the account with a fresh identifier. New accounts start active.
    #[must_use]
    pub fn into_account(self) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::generate(),
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldUpdate;

    fn new_account() -> NewAccount {
        NewAccount {
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
        }
    }

    #[test]
    fn test_into_account_assigns_identity() {
        let account = new_account().into_account();
        assert!(!account.id.as_str().is_empty());
        assert!(account.is_active);
        assert_eq!(account.created_at, account.updated_at);
        assert_eq!(account.email, "a@x.com");
    }

    #[test]
    fn test_apply_patch_touches_only_set_fields() {
        let mut account = new_account().into_account();
        let before = account.updated_at;
        let patch = ProfilePatch {
            first_name: FieldUpdate::Omitted,
            last_name: FieldUpdate::Set("Lovelace".to_string()),
        };

        account.apply_patch(&patch);

        assert_eq!(account.first_name, Some("Ada".to_string()));
        assert_eq!(account.last_name, Some("Lovelace".to_string()));
        assert!(account.updated_at >= before);
    }

    #[test]
    fn test_serialized_form_keeps_password_hash() {
        let account = new_account().into_account();
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["password_hash"], "$argon2id$fake");
        let back: Account = serde_json::from_value(json).unwrap();
        assert_eq!(back, account);
    }
}
