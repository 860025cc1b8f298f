use thiserror::Error;

use crate::planets::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("already exists")]
    AlreadyExists,

    #[error("a planet named '{0}' already exists")]
    Duplicate(String),

    #[error("token lookup collision")]
    TokenLookupCollision,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("token expired")]
    TokenExpired,

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("upstream fetch failed: {0}")]
    Upstream(String),
}

pub type Result<T> = std::result::Result<T, Error>;
