//! Account controller.

use crate::{
    extractors::{AuthenticatedAccount, ValidatedJson},
    responses::{created, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use meridian_core::{AccountId, MeridianError, ProfilePatch};
use meridian_service::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body of single-account responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountEnvelope {
    pub account: AccountResponse,
}

/// Creates the account router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me).patch(update_me))
        .route("/:id", get(get_account))
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    debug!("Registration request for: {}", request.email);

    let response = state.account_service.register(request).await?;
    Ok(created(response))
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    debug!("Login request for: {}", request.email);

    let response = state.account_service.authenticate(request).await?;
    ok(response)
}

/// Current account, served through the cache.
async fn get_me(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
) -> ApiResult<AccountEnvelope> {
    load(&state, &caller.account_id()).await
}

async fn update_me(
    State(state): State<AppState>,
    caller: AuthenticatedAccount,
    ValidatedJson(patch): ValidatedJson<ProfilePatch>,
) -> ApiResult<AccountEnvelope> {
    let id = caller.account_id();
    debug!("Profile update request: {}", id);

    let account = state.account_service.update_profile(&id, patch).await?;
    ok(AccountEnvelope { account })
}

async fn get_account(
    State(state): State<AppState>,
    _caller: AuthenticatedAccount,
    Path(id): Path<String>,
) -> ApiResult<AccountEnvelope> {
    load(&state, &AccountId::new(id)).await
}

async fn load(state: &AppState, id: &AccountId) -> ApiResult<AccountEnvelope> {
    let account = state
        .account_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| MeridianError::not_found("Account", id))?;

    ok(AccountEnvelope { account })
}
