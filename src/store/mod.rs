mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Planet operations

    /// Inserts a planet and returns its assigned id.
    /// Fails with `Error::AlreadyExists` when the name collides case-insensitively.
    fn create_planet(&self, planet: &Planet) -> Result<i64>;
    /// Exact, case-sensitive lookup.
    fn get_planet_by_name(&self, name: &str) -> Result<Option<Planet>>;
    fn find_planet_by_name_ci(&self, name: &str) -> Result<Option<Planet>>;
    fn list_planets(&self, filter: &PlanetFilter) -> Result<Vec<Planet>>;
    /// Rewrites every column of the planet with the given id.
    fn update_planet(&self, planet: &Planet) -> Result<()>;
    fn delete_planet(&self, id: i64) -> Result<bool>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    // Token operations
    fn create_token(&self, token: &Token) -> Result<()>;
    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>>;
    fn update_token_last_used(&self, id: &str) -> Result<()>;
}
