use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::password::verify_password;
use super::{TokenGenerator, token_lookup};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{Token, User};

const MAX_TOKEN_RETRIES: u32 = 3;

/// Credentials presented in an `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
pub enum Credentials {
    /// `Token <key>` or `Bearer <key>`
    Token(String),
    /// `Basic base64(username:password)`
    Basic { username: String, password: String },
}

#[derive(Debug)]
pub enum CredentialError {
    InvalidScheme,
    Malformed,
}

/// Decodes a Basic auth header value into username and password.
pub fn extract_basic_credentials(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;

    let (username, password) = credentials.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

/// Parses an Authorization header.
/// Returns `Ok(None)` if no header is present.
pub fn extract_credentials(
    auth_header: Option<&str>,
) -> std::result::Result<Option<Credentials>, CredentialError> {
    let Some(header) = auth_header else {
        return Ok(None);
    };

    if let Some(key) = header
        .strip_prefix("Token ")
        .or_else(|| header.strip_prefix("Bearer "))
    {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::Malformed);
        }
        return Ok(Some(Credentials::Token(key.to_string())));
    }

    if header.starts_with("Basic ") {
        return extract_basic_credentials(header)
            .map(|(username, password)| Some(Credentials::Basic { username, password }))
            .ok_or(CredentialError::Malformed);
    }

    Err(CredentialError::InvalidScheme)
}

/// Validates a raw API token and returns its owner. Records the use on the
/// token row.
pub fn validate_token(store: &dyn Store, raw_token: &str) -> Result<User> {
    let lookup = token_lookup(raw_token).map_err(|_| Error::Unauthorized)?;

    let token = store
        .get_token_by_lookup(lookup)?
        .ok_or(Error::Unauthorized)?;

    if !TokenGenerator::new().verify(raw_token, &token.token_hash)? {
        return Err(Error::Unauthorized);
    }

    if let Some(expires_at) = &token.expires_at {
        if expires_at < &Utc::now() {
            return Err(Error::TokenExpired);
        }
    }

    let user = store.get_user(&token.user_id)?.ok_or(Error::Unauthorized)?;

    if let Err(e) = store.update_token_last_used(&token.id) {
        tracing::warn!("Failed to update token last_used_at: {e}");
    }

    Ok(user)
}

/// Checks a username/password pair.
pub fn authenticate_user(store: &dyn Store, username: &str, password: &str) -> Result<User> {
    let user = store
        .get_user_by_username(username)?
        .ok_or(Error::Unauthorized)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(Error::Unauthorized);
    }

    Ok(user)
}

/// Mints and stores a new token for `user_id`, returning it with the raw
/// token string. The raw string is never stored.
pub fn issue_token(
    store: &dyn Store,
    user_id: &str,
    ttl_seconds: Option<i64>,
) -> Result<(Token, String)> {
    let generator = TokenGenerator::new();
    let expires_at = ttl_seconds.map(|s| Utc::now() + Duration::seconds(s));

    for _ in 0..MAX_TOKEN_RETRIES {
        let new_token = generator.generate()?;
        let token = Token {
            id: Uuid::new_v4().to_string(),
            token_hash: new_token.hash,
            token_lookup: new_token.lookup,
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            expires_at,
            last_used_at: None,
        };

        match store.create_token(&token) {
            Ok(()) => return Ok((token, new_token.raw)),
            Err(Error::TokenLookupCollision) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(Error::TokenLookupCollision)
}
