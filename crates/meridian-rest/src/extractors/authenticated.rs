//! Bearer token extractor.

use crate::{responses::AppError, state::AppState};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use meridian_core::{AccountId, MeridianError};
use meridian_security::SessionClaims;
use tracing::debug;

/// Claims of the caller, verified through the account service.
///
/// Rejects with 401 when the `Authorization` header is missing, is not a
/// bearer credential, or carries a token that fails verification.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub SessionClaims);

impl AuthenticatedAccount {
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.0.account_id()
    }
}

impl std::ops::Deref for AuthenticatedAccount {
    type Target = SessionClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                MeridianError::unauthorized("Missing or invalid Authorization header")
            })?;

        let claims = state.account_service.verify_token(token)?;
        debug!("Authenticated account: {}", claims.sub);

        Ok(Self(claims))
    }
}
