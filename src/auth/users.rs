use chrono::Utc;
use uuid::Uuid;

use super::password::hash_password;
use crate::error::{Error, Result};
use crate::planets::FieldErrors;
use crate::store::Store;
use crate::types::User;

const MAX_USERNAME_LEN: usize = 150;

pub fn validate_username(username: &str) -> std::result::Result<(), String> {
    if username.trim().is_empty() {
        return Err("Username cannot be empty.".to_string());
    }
    if username.contains(char::is_whitespace) {
        return Err("Username cannot contain whitespace.".to_string());
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(format!(
            "Ensure this field has no more than {MAX_USERNAME_LEN} characters."
        ));
    }
    Ok(())
}

/// Validates and stores a new user. Used by both `register` and
/// `planetary user create`.
pub fn create_user(store: &dyn Store, username: &str, password: &str) -> Result<User> {
    let mut errors = FieldErrors::new();
    if let Err(message) = validate_username(username) {
        errors.add("username", message);
    }
    if password.is_empty() {
        errors.add("password", "This field may not be blank.");
    }
    errors.into_result(()).map_err(Error::Validation)?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        password_hash: hash_password(password)?,
        created_at: now,
        updated_at: now,
    };

    match store.create_user(&user) {
        Ok(()) => {}
        Err(Error::AlreadyExists) => {
            let mut errors = FieldErrors::new();
            errors.add("username", "A user with that username already exists.");
            return Err(Error::Validation(errors));
        }
        Err(e) => return Err(e),
    }

    tracing::info!("Created user '{}'", user.username);
    Ok(user)
}
