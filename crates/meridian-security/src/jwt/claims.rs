//! Session token claims.

use chrono::{DateTime, Utc};
use meridian_core::AccountId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (account ID).
    pub sub: String,
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    /// JWT ID, unique per issued token.
    pub jti: String,
}

impl SessionClaims {
    #[must_use]
    pub fn new(
        account_id: &AccountId,
        email: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: account_id.to_string(),
            email: email.into(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.into(),
            aud: audience.into(),
            jti: Uuid::now_v7().to_string(),
        }
    }

    /// Returns the account this token was issued for.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        AccountId::new(self.sub.clone())
    }
}
