//! Authentication-related DTOs.

use super::AccountResponse;
use meridian_core::rules::not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Registration request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "not_blank", message = "Password is required"))]
    pub password: String,

    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Authentication response for registration and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account: AccountResponse,
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

impl AuthResponse {
    #[must_use]
    pub fn bearer(account: AccountResponse, token: String, expires_in: u64) -> Self {
        Self {
            account,
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
