use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderValue, StatusCode, header::AUTHORIZATION, header::WWW_AUTHENTICATE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::helpers::{
    CredentialError, Credentials, authenticate_user, extract_credentials, validate_token,
};
use crate::error::Error;
use crate::server::AppState;
use crate::types::User;

/// Extractor that requires a valid token or username/password.
pub struct RequireAuth {
    pub user: User,
}

#[derive(Debug)]
pub enum AuthError {
    MissingAuth,
    InvalidScheme,
    InvalidCredentials,
    InvalidToken,
    TokenExpired,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "Authentication credentials were not provided.",
            ),
            AuthError::InvalidScheme => (StatusCode::UNAUTHORIZED, "Invalid authorization scheme"),
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username/password.")
            }
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token."),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired."),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = json!({ "data": null, "error": message });

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                HeaderValue::from_static("Token realm=\"planetary\""),
            );
        }

        response
    }
}

impl FromRequestParts<Arc<AppState>> for RequireAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let credentials = extract_credentials(auth_header)
            .map_err(|e| match e {
                CredentialError::InvalidScheme => AuthError::InvalidScheme,
                CredentialError::Malformed => AuthError::InvalidCredentials,
            })?
            .ok_or(AuthError::MissingAuth)?;

        let store = state.store.as_ref();
        match credentials {
            Credentials::Token(raw_token) => {
                let user = validate_token(store, &raw_token).map_err(|e| match e {
                    Error::Unauthorized => AuthError::InvalidToken,
                    Error::TokenExpired => AuthError::TokenExpired,
                    other => {
                        tracing::error!("Token validation failed: {other}");
                        AuthError::InternalError
                    }
                })?;
                Ok(RequireAuth { user })
            }
            Credentials::Basic { username, password } => {
                let user =
                    authenticate_user(store, &username, &password).map_err(|e| match e {
                        Error::Unauthorized => AuthError::InvalidCredentials,
                        other => {
                            tracing::error!("Password check failed: {other}");
                            AuthError::InternalError
                        }
                    })?;
                Ok(RequireAuth { user })
            }
        }
    }
}
