use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::response::ApiError;
use crate::planets::FieldErrors;
use crate::types::from_object;

/// Key for errors about the body as a whole rather than one field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// A JSON object request body. Rejections answer with the API error envelope
/// and status 400 instead of axum's plain-text response.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        from_object(value).map(JsonBody).map_err(|message| {
            let mut fields = FieldErrors::new();
            fields.add(NON_FIELD_ERRORS, message);
            ApiError::validation(fields)
        })
    }
}
