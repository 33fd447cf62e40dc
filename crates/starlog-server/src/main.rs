//! Starlog Server binary.

use anyhow::{Context, Result};
use clap::Parser;
use starlog_core::config::{AppConfig, CacheConfig, NetworkConfig};
use starlog_core::{
    CacheSettings, CommitService, GitHubCommitFetcher, GitHubSettings, SqliteCommitStore,
    StoreSettings,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "starlog-server")]
#[command(about = "HTTP backend for browsing and starring repository commits")]
struct Args {
    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// GitHub REST API base URL
    #[arg(long, env = "STARLOG_GITHUB_BASE_URL", default_value = NetworkConfig::GITHUB_API_BASE)]
    github_base_url: String,

    /// GitHub access token (anonymous requests when absent)
    #[arg(long, env = "STARLOG_GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Value sent as X-GitHub-Api-Version
    #[arg(long, default_value = NetworkConfig::GITHUB_API_VERSION)]
    github_api_version: String,

    /// SQLite database file (defaults to the user data directory)
    #[arg(long, env = "STARLOG_DATABASE")]
    database: Option<PathBuf>,

    /// Directory holding the single-page client
    #[arg(long, env = "STARLOG_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Idle seconds before a cached listing expires
    #[arg(long, default_value_t = CacheConfig::TIME_TO_IDLE.as_secs())]
    cache_ttl_secs: u64,
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(AppConfig::DATA_DIR_NAME)
        .join(AppConfig::DATABASE_FILENAME)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging; RUST_LOG overrides --debug when present
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    info!("Starting {} server", AppConfig::APP_NAME);

    let github = GitHubSettings {
        base_url: args.github_base_url,
        access_token: args.github_token,
        api_version: args.github_api_version,
        ..Default::default()
    };
    let store_settings = StoreSettings::new(args.database.unwrap_or_else(default_database_path));
    let cache_settings = CacheSettings {
        time_to_idle: Duration::from_secs(args.cache_ttl_secs),
        ..Default::default()
    };

    info!("Database: {}", store_settings.database_path.display());

    let fetcher = GitHubCommitFetcher::new(&github).context("invalid GitHub settings")?;
    let store = SqliteCommitStore::new(&store_settings.database_path)
        .context("failed to open commit store")?;
    let service = CommitService::new(Arc::new(fetcher), Arc::new(store), &cache_settings);

    let addr = starlog_server::start_server(service, args.static_dir, &args.host, args.port).await?;
    info!("{} running on http://{}", AppConfig::APP_NAME, addr);

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, exiting");

    Ok(())
}
