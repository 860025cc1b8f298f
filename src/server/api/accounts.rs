use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::auth::{authenticate_user, create_user, issue_token};
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{CredentialsRequest, TokenResponse};
use crate::server::extract::JsonBody;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn register(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = req.into_parts().map_err(ApiError::validation)?;

    let user = create_user(state.store.as_ref(), &username, &password)?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

pub async fn obtain_token(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (username, password) = req.into_parts().map_err(ApiError::validation)?;
    let store = state.store.as_ref();

    let user = authenticate_user(store, &username, &password).map_err(|e| match e {
        Error::Unauthorized => ApiError::bad_request("Unable to log in with provided credentials."),
        other => ApiError::from(other),
    })?;

    let (token, raw_token) =
        issue_token(store, &user.id, state.token_ttl_seconds).api_err("Failed to create token")?;

    Ok(Json(ApiResponse::success(TokenResponse {
        token: raw_token,
        expires_at: token.expires_at,
    })))
}
