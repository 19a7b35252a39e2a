//! Validated JSON extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use meridian_core::{field_errors, MeridianError};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has been deserialized and validated.
///
/// Malformed bodies and rule violations are both rejected with 400
/// `VALIDATION_ERROR`; rule violations carry field-level details.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                MeridianError::validation(format!("Invalid JSON: {}", rejection.body_text()))
            })?;

        value.validate().map_err(|errors| {
            AppError::with_details(
                MeridianError::validation("Request validation failed"),
                field_errors(&errors),
            )
        })?;

        Ok(Self(value))
    }
}
