//! cohort-api server binary.
//!
//! Loads configuration from a TOML file layered with `COHORT_*` environment
//! variables, opens the SQLite store, and serves the REST API over HTTP.
//!
//! The `hash-password` subcommand produces the argon2 PHC string expected by
//! `admin_password_hash` in config.toml:
//!
//! ```text
//! cargo run -p cohort-api --bin server -- hash-password
//! ```

use std::{
  io::{self, BufRead as _, Write as _},
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher as _, password_hash::SaltString};
use clap::{Parser, Subcommand};
use cohort_api::{AppState, ServerConfig, auth::TokenKeeper};
use cohort_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cohort membership platform server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Hash a password read from stdin and print the argon2 PHC string.
  HashPassword,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Command::HashPassword) => hash_password(),
    None => serve(load_config(&cli.config)?).await,
  }
}

/// Layer the config file under `COHORT_*` environment overrides.
fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("COHORT"))
    .build()
    .context("failed to read config file")?
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
  let database_path = expand_tilde(&cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;

  let state = AppState {
    store:  Arc::new(store),
    tokens: Arc::new(TokenKeeper::new(&cfg.jwt_secret, cfg.token_ttl_minutes)),
    config: Arc::new(cfg.clone()),
  };

  let app = cohort_api::router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!("Listening on http://{address}");
  axum::serve(listener, app).await.context("server error")
}

fn hash_password() -> anyhow::Result<()> {
  print!("Password: ");
  io::stdout().flush().ok();

  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let password = line.trim_end_matches(['\n', '\r']);

  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
  println!("{hash}");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
