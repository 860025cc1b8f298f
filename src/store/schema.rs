pub const SCHEMA: &str = r#"
-- Planets; names are unique regardless of case
CREATE TABLE IF NOT EXISTS planets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    population INTEGER,              -- NULL = unknown
    terrains TEXT NOT NULL DEFAULT '',
    climates TEXT NOT NULL DEFAULT '',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Accounts that can obtain API tokens
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,       -- argon2id PHC string
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Tokens are auth credentials bound to a user
CREATE TABLE IF NOT EXISTS tokens (
    id TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL,          -- argon2id hash with embedded salt
    token_lookup TEXT NOT NULL,        -- lookup segment of the raw token
    user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,

    -- Lifecycle
    created_at TEXT DEFAULT (datetime('now')),
    expires_at TEXT,            -- NULL = never
    last_used_at TEXT
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_planets_population ON planets(population);
CREATE UNIQUE INDEX IF NOT EXISTS idx_tokens_lookup ON tokens(token_lookup);
CREATE INDEX IF NOT EXISTS idx_tokens_user ON tokens(user_id);
"#;
