//! # Planetary
//!
//! A planet catalogue API, usable both as a standalone binary and as a library.
//! Planets are ingested from the SWAPI GraphQL endpoint, stored in SQLite and
//! served over a token-authenticated JSON API.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! planetary = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use planetary::config::ServerConfig;
//! use planetary::server::{AppState, create_router};
//! use planetary::store::{SqliteStore, Store};
//!
//! let config = ServerConfig::default();
//! let store = SqliteStore::new(config.db_path()).unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(Arc::new(store), &config).unwrap());
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `planetary` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod planets;
pub mod server;
pub mod store;
pub mod types;
