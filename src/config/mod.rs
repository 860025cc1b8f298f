mod server;

pub use server::{DEFAULT_SOURCE_URL, ServerConfig};
