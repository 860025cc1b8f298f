//! API keys handed out by `api-token-auth`.
//!
//! A key reads `planetary_<lookup>_<secret>`. The lookup part is stored in
//! clear and indexed so a presented key finds its row in one query; the whole
//! key is stored only as an argon2id hash.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;

use super::password::{argon2_hash, argon2_verify};
use crate::error::{Error, Result};

const ARGON2_MEMORY_KIB: u32 = 64 * 1024;
const ARGON2_ITERATIONS: u32 = 1;
const ARGON2_PARALLELISM: u32 = 4;

const KEY_PREFIX: &str = "planetary";
const LOOKUP_LENGTH: usize = 8;
const SECRET_LENGTH: usize = 24;

/// A freshly minted key. `raw` is shown to the client once and then dropped.
#[derive(Debug)]
pub struct NewToken {
    pub raw: String,
    pub lookup: String,
    pub hash: String,
}

pub struct TokenGenerator {
    argon2: Argon2<'static>,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenGenerator {
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, None)
            .unwrap_or_default();

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    pub fn generate(&self) -> Result<NewToken> {
        let lookup = random_hex(LOOKUP_LENGTH);
        let raw = format!("{KEY_PREFIX}_{lookup}_{}", random_hex(SECRET_LENGTH));
        let hash = argon2_hash(&self.argon2, &raw, "token")?;
        Ok(NewToken { raw, lookup, hash })
    }

    pub fn verify(&self, raw: &str, hash: &str) -> Result<bool> {
        argon2_verify(&self.argon2, raw, hash, "token")
    }
}

fn random_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
        .collect()
}

/// Returns the lookup part of a presented key, or `InvalidTokenFormat` when
/// the key is not shaped like one this server issues.
pub fn token_lookup(raw: &str) -> Result<&str> {
    let (lookup, secret) = raw
        .strip_prefix(KEY_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.split_once('_'))
        .ok_or(Error::InvalidTokenFormat)?;

    let is_hex = |part: &str| part.chars().all(|c| c.is_ascii_hexdigit());
    if lookup.len() != LOOKUP_LENGTH
        || secret.len() != SECRET_LENGTH
        || !is_hex(lookup)
        || !is_hex(secret)
    {
        return Err(Error::InvalidTokenFormat);
    }

    Ok(lookup)
}
