//! Cache key generators for consistent key naming.

use meridian_core::AccountId;

/// Prefix shared by every account entry.
pub const ACCOUNT_KEY_PREFIX: &str = "account";

/// Generate the cache key for an account by ID.
#[must_use]
pub fn account_by_id(id: &AccountId) -> String {
    format!("{}:{}", ACCOUNT_KEY_PREFIX, id)
}
