use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_URL: &str = "https://swapi-graphql.netlify.app/.netlify/functions/index";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// GraphQL endpoint planets are ingested from.
    pub source_url: String,
    /// Lifetime of tokens issued by the token endpoint. `None` means they never expire.
    pub token_ttl_seconds: Option<i64>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("planetary.db")
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            token_ttl_seconds: None,
        }
    }
}
