use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use planetary::auth::{create_user, validate_username};
use planetary::config::{DEFAULT_SOURCE_URL, ServerConfig};
use planetary::planets::{SwapiClient, reconcile};
use planetary::server::{AppState, create_router};
use planetary::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "planetary")]
#[command(about = "A planet catalogue API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Manage API users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Ingest planets from the upstream source once and exit
    Fetch {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// GraphQL endpoint to ingest planets from
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        source_url: String,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// GraphQL endpoint to ingest planets from
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        source_url: String,

        /// Lifetime of issued API tokens. Tokens never expire when unset.
        #[arg(long)]
        token_ttl_seconds: Option<i64>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create the database)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create a user that can obtain API tokens
    Create {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        #[arg(long)]
        username: String,

        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

fn db_path(data_dir: &str) -> PathBuf {
    ServerConfig {
        data_dir: data_dir.into(),
        ..ServerConfig::default()
    }
    .db_path()
}

fn open_store(db_path: &Path) -> anyhow::Result<SqliteStore> {
    if !db_path.exists() {
        bail!("Server not initialized. Run 'planetary admin init' first to create the database.");
    }
    let store = SqliteStore::new(db_path)?;
    store.initialize()?;
    Ok(store)
}

fn prompt_password() -> anyhow::Result<String> {
    Ok(inquire::Password::new("Password:")
        .with_validator(|input: &str| {
            if input.is_empty() {
                Ok(inquire::validator::Validation::Invalid(
                    "Password cannot be empty".into(),
                ))
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?)
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let data_path: PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("planetary.db");
    if db_path.exists() {
        bail!("Server already initialized. Database exists at: {}", db_path.display());
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!("Database created at: {}", db_path.display());

    if !non_interactive {
        create_default_user_prompt(&store)?;
    }

    Ok(())
}

fn create_default_user_prompt(store: &SqliteStore) -> anyhow::Result<()> {
    let create = inquire::Confirm::new("Would you like to create a user?")
        .with_default(false)
        .prompt()?;

    if !create {
        return Ok(());
    }

    let username = inquire::Text::new("Username:")
        .with_validator(|input: &str| {
            Ok(match validate_username(input) {
                Ok(()) => inquire::validator::Validation::Valid,
                Err(message) => inquire::validator::Validation::Invalid(message.into()),
            })
        })
        .prompt()?;
    let password = prompt_password()?;

    let user = create_user(store, &username, &password)?;
    println!("Created user '{}'", user.username);

    Ok(())
}

async fn run_fetch(data_dir: String, source_url: String) -> anyhow::Result<()> {
    let store = open_store(&db_path(&data_dir))?;
    let client = SwapiClient::new(source_url)?;

    let candidates = client.fetch_planets().await?;
    let report = reconcile(&store, candidates)?;

    println!("Saved {} planet(s)", report.saved_planets.len());
    for planet in &report.saved_planets {
        println!("  + {}", planet.name);
    }
    println!("Skipped {} existing planet(s)", report.skipped_planets.len());
    for name in &report.skipped_planets {
        println!("  = {name}");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("planetary=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                non_interactive,
            } => {
                run_init(data_dir, non_interactive)?;
            }
        },
        Commands::User { command } => match command {
            UserCommands::Create {
                data_dir,
                username,
                password,
            } => {
                let store = open_store(&db_path(&data_dir))?;
                let password = match password {
                    Some(password) => password,
                    None => prompt_password()?,
                };
                let user = create_user(&store, &username, &password)?;
                println!("Created user '{}'", user.username);
            }
        },
        Commands::Fetch {
            data_dir,
            source_url,
        } => {
            run_fetch(data_dir, source_url).await?;
        }
        Commands::Serve {
            host,
            port,
            data_dir,
            source_url,
            token_ttl_seconds,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                source_url,
                token_ttl_seconds,
            };

            let store = open_store(&config.db_path())?;
            let state = Arc::new(
                AppState::new(Arc::new(store), &config).context("failed to build app state")?,
            );

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);
            info!("Ingesting planets from {}", config.source_url);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
