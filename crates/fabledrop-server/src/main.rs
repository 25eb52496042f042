//! fabledrop server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`, overridable
//! field-by-field via `FABLEDROP_*` environment variables), opens the SQLite
//! store, wires up the Google Books and userinfo clients, and serves the
//! JSON API under `/api` for the browser UI.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Json, Router, http::HeaderValue, routing::get};
use clap::Parser;
use fabledrop_api::AppState;
use fabledrop_google::{
  BooksConfig, GoogleBooksClient, GoogleIdentity, IdentityConfig,
};
use fabledrop_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "FableDrop subscription server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:           String,
  #[serde(default = "default_port")]
  port:           u16,
  #[serde(default = "default_store_path")]
  store_path:     PathBuf,
  /// Browser origin allowed to call the API; unset disables CORS entirely.
  cors_origin:    Option<String>,
  #[serde(default = "default_books_base_url")]
  books_base_url: String,
  books_api_key:  Option<String>,
  #[serde(default = "default_userinfo_url")]
  userinfo_url:   String,
}

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  5001
}

fn default_store_path() -> PathBuf {
  PathBuf::from("fabledrop.db")
}

fn default_books_base_url() -> String {
  BooksConfig::default().base_url
}

fn default_userinfo_url() -> String {
  IdentityConfig::default().userinfo_url
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("FABLEDROP"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // External collaborators.
  let catalog = GoogleBooksClient::new(BooksConfig {
    base_url: server_cfg.books_base_url.clone(),
    api_key:  server_cfg.books_api_key.clone(),
  })
  .context("failed to build books client")?;
  let identity = GoogleIdentity::new(IdentityConfig {
    userinfo_url: server_cfg.userinfo_url.clone(),
  })
  .context("failed to build identity client")?;

  // Build application state.
  let state = AppState {
    store:    Arc::new(store),
    catalog:  Arc::new(catalog),
    identity: Arc::new(identity),
  };

  let mut app = Router::new()
    .route("/health", get(health))
    .nest("/api", fabledrop_api::api_router(state))
    .layer(TraceLayer::new_for_http());

  if let Some(origin) = &server_cfg.cors_origin {
    let origin: HeaderValue = origin
      .parse()
      .with_context(|| format!("invalid cors_origin {origin:?}"))?;
    app = app.layer(
      CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
          axum::http::header::CONTENT_TYPE,
          axum::http::header::AUTHORIZATION,
        ]),
    );
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({ "status": "ok" }))
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
