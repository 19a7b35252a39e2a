//! JWT token provider for issuing and verifying session tokens.

use super::SessionClaims;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use meridian_config::SecurityConfig;
use meridian_core::{AccountId, MeridianError, MeridianResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// A freshly signed token and its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Lifetime in seconds from issuance.
    pub expires_in: u64,
}

/// Sign/verify capability for bearer session tokens.
pub trait TokenProviderInterface: Send + Sync {
    /// Issues a token carrying `{id, email}` with the configured lifetime.
    fn issue(&self, account_id: &AccountId, email: &str) -> MeridianResult<IssuedToken>;

    /// Verifies signature, issuer, audience and expiry.
    ///
    /// Every failure is reported as `InvalidToken`.
    fn verify(&self, token: &str) -> MeridianResult<SessionClaims>;
}

/// HS256 JWT token provider.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: Arc<SecurityConfig>,
    validation: Validation,
}

impl TokenProvider {
    #[must_use]
    pub fn new(config: Arc<SecurityConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.set_audience(&[&config.jwt_audience]);
        validation.validate_exp = true;

        Self {
            encoding_key,
            decoding_key,
            config,
            validation,
        }
    }

    /// Signs arbitrary claims. Expiry is whatever `claims.exp` says.
    pub fn sign(&self, claims: &SessionClaims) -> MeridianResult<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| MeridianError::Internal(format!("Failed to sign token: {}", e)))
    }
}

impl TokenProviderInterface for TokenProvider {
    fn issue(&self, account_id: &AccountId, email: &str) -> MeridianResult<IssuedToken> {
        let expires_in = self.config.jwt_expiration_secs;
        let expires_at = i64::try_from(expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                MeridianError::Configuration(format!("Token lifetime out of range: {}s", expires_in))
            })?;
        let claims = SessionClaims::new(
            account_id,
            email,
            self.config.jwt_issuer.clone(),
            self.config.jwt_audience.clone(),
            expires_at,
        );

        let token = self.sign(&claims)?;
        debug!("Issued session token for account {}", account_id);

        Ok(IssuedToken { token, expires_in })
    }

    fn verify(&self, token: &str) -> MeridianResult<SessionClaims> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                warn!("Token validation failed: {}", e);
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "Token expired".to_string(),
                    ErrorKind::InvalidSignature => "Invalid token signature".to_string(),
                    ErrorKind::InvalidIssuer => "Invalid token issuer".to_string(),
                    ErrorKind::InvalidAudience => "Invalid token audience".to_string(),
                    _ => e.to_string(),
                };
                MeridianError::InvalidToken(reason)
            })?;

        Ok(token_data.claims)
    }
}
