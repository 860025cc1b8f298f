use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{Error, Result};

/// Hashes `secret` into a PHC string with a fresh salt. `what` names the
/// secret in error messages.
pub(super) fn argon2_hash(argon2: &Argon2<'_>, secret: &str, what: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Config(format!("failed to hash {what}: {e}")))
}

/// Returns false on a mismatch; errors only on a malformed hash.
pub(super) fn argon2_verify(argon2: &Argon2<'_>, secret: &str, hash: &str, what: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| Error::Config(format!("invalid {what} hash format: {e}")))?;

    match argon2.verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(Error::Config(format!("failed to verify {what}: {e}"))),
    }
}

/// Hashes a user password with argon2's default parameters.
pub fn hash_password(password: &str) -> Result<String> {
    argon2_hash(&Argon2::default(), password, "password")
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    argon2_verify(&Argon2::default(), password, hash, "password")
}
