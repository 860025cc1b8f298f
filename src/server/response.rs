use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::{Error, Result as StoreResult};
use crate::planets::FieldErrors;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

/// API error that converts to a proper HTTP response
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub fields: Option<FieldErrors>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            fields: None,
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            fields: Some(fields),
            ..Self::bad_request("Invalid input.")
        }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(fields) => ApiError::validation(fields),
            Error::NotFound => ApiError::not_found("Not found"),
            Error::Duplicate(name) => {
                ApiError::bad_request(format!("A planet named '{name}' already exists."))
            }
            Error::AlreadyExists => ApiError::bad_request("Already exists"),
            Error::Upstream(message) => ApiError::bad_request(message),
            Error::Unauthorized | Error::TokenExpired | Error::InvalidTokenFormat => {
                ApiError::unauthorized("Invalid credentials")
            }
            other => {
                tracing::error!("Request failed: {other}");
                ApiError::internal("Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.fields {
            Some(fields) => json!({ "data": null, "error": self.message, "fields": fields }),
            None => json!({ "data": null, "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Extension trait for converting store results to API errors with a custom message.
pub trait StoreResultExt<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> StoreResultExt<T> for StoreResult<T> {
    fn api_err(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            ApiError::internal(message)
        })
    }
}

/// Extension for store results where `Error::NotFound` names a specific entity.
pub trait NotFoundExt<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> NotFoundExt<T> for StoreResult<T> {
    fn or_not_found(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            Error::NotFound => ApiError::not_found(message),
            other => ApiError::from(other),
        })
    }
}
