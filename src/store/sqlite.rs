use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter, types::Value};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const PLANET_COLUMNS: &str = "id, name, population, terrains, climates, created_at, updated_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn planet_from_row(row: &Row<'_>) -> rusqlite::Result<Planet> {
    Ok(Planet {
        id: row.get(0)?,
        name: row.get(1)?,
        population: row.get(2)?,
        terrains: row.get(3)?,
        climates: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        updated_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

/// Escapes LIKE wildcards so the needle matches literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Builds the WHERE clause and its bound values for a planet filter.
fn filter_clause(filter: &PlanetFilter) -> (String, Vec<Value>) {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &filter.name {
        conditions.push("name = ? COLLATE BINARY");
        values.push(Value::Text(name.clone()));
    }
    if let Some(needle) = &filter.name_contains {
        conditions.push("name LIKE ? ESCAPE '\\'");
        values.push(Value::Text(like_pattern(needle)));
    }
    if let Some(population) = filter.population {
        conditions.push("population = ?");
        values.push(Value::Integer(population));
    }
    if let Some(min) = filter.population_gte {
        conditions.push("population >= ?");
        values.push(Value::Integer(min));
    }
    if let Some(max) = filter.population_lte {
        conditions.push("population <= ?");
        values.push(Value::Integer(max));
    }
    if let Some(needle) = &filter.terrains_contains {
        conditions.push("terrains LIKE ? ESCAPE '\\'");
        values.push(Value::Text(like_pattern(needle)));
    }
    if let Some(needle) = &filter.climates_contains {
        conditions.push("climates LIKE ? ESCAPE '\\'");
        values.push(Value::Text(like_pattern(needle)));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Planet operations

    fn create_planet(&self, planet: &Planet) -> Result<i64> {
        let conn = self.conn();
        let result = conn.execute(
            "INSERT INTO planets (name, population, terrains, climates, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                planet.name,
                planet.population,
                planet.terrains,
                planet.climates,
                format_datetime(&planet.created_at),
                format_datetime(&planet.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_planet_by_name(&self, name: &str) -> Result<Option<Planet>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PLANET_COLUMNS} FROM planets WHERE name = ?1 COLLATE BINARY"),
            params![name],
            planet_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn find_planet_by_name_ci(&self, name: &str) -> Result<Option<Planet>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {PLANET_COLUMNS} FROM planets WHERE name = ?1 COLLATE NOCASE"),
            params![name],
            planet_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_planets(&self, filter: &PlanetFilter) -> Result<Vec<Planet>> {
        let (clause, values) = filter_clause(filter);
        let conn = self.conn();
        let mut stmt =
            conn.prepare(&format!("SELECT {PLANET_COLUMNS} FROM planets{clause} ORDER BY id"))?;

        let rows = stmt.query_map(params_from_iter(values), planet_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_planet(&self, planet: &Planet) -> Result<()> {
        let result = self.conn().execute(
            "UPDATE planets SET name = ?1, population = ?2, terrains = ?3, climates = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                planet.name,
                planet.population,
                planet.terrains,
                planet.climates,
                format_datetime(&planet.updated_at),
                planet.id,
            ],
        );

        match result {
            Ok(0) => Err(Error::NotFound),
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn delete_planet(&self, id: i64) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM planets WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO users (id, username, password_hash, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id,
                user.username,
                user.password_hash,
                format_datetime(&user.created_at),
                format_datetime(&user.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, username, password_hash, created_at, updated_at FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, username, password_hash, created_at, updated_at
             FROM users WHERE username = ?1",
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Token operations

    fn create_token(&self, token: &Token) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO tokens (id, token_hash, token_lookup, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                token.id,
                token.token_hash,
                token.token_lookup,
                token.user_id,
                format_datetime(&token.created_at),
                token.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::TokenLookupCollision),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_token_by_lookup(&self, lookup: &str) -> Result<Option<Token>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at
             FROM tokens WHERE token_lookup = ?1",
            params![lookup],
            |row| {
                Ok(Token {
                    id: row.get(0)?,
                    token_hash: row.get(1)?,
                    token_lookup: row.get(2)?,
                    user_id: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                    expires_at: row
                        .get::<_, Option<String>>(5)?
                        .map(|s| parse_datetime(&s)),
                    last_used_at: row
                        .get::<_, Option<String>>(6)?
                        .map(|s| parse_datetime(&s)),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_token_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE tokens SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }
}
