//! Concours server - vehicle show portal backend
//!
//! Wires configuration, logging, database and media storage together and
//! serves the portal API.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use concours_api::{ApiServer, ApiServerConfig};
use concours_media::MediaStore;

/// Concours - vehicle show event portal
#[derive(Parser, Debug)]
#[command(name = "concours")]
#[command(about = "Concours - vehicle show event portal")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Address to bind the HTTP server
    #[arg(long, env = "CONCOURS_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Database connection URL
    #[arg(
        long,
        env = "CONCOURS_DATABASE_URL",
        default_value = "sqlite://concours.db?mode=rwc"
    )]
    database_url: String,

    /// Media storage root directory
    #[arg(long, env = "CONCOURS_MEDIA_ROOT", default_value = "media")]
    media_root: String,

    /// Current session signing secret
    #[arg(long, env = "CONCOURS_SESSION_SECRET")]
    session_secret: String,

    /// Comma-separated prior signing secrets still accepted for
    /// verification, so in-flight sessions survive a rotation
    #[arg(long, env = "CONCOURS_PREVIOUS_SECRETS", value_delimiter = ',')]
    previous_secrets: Vec<String>,

    /// Disable self-registration
    #[arg(long, env = "CONCOURS_DISABLE_SIGNUP")]
    disable_signup: bool,

    /// Disable the permissive development CORS layer
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let db = concours_db::connect(&cli.database_url)
        .await
        .context("Failed to connect to database")?;
    concours_db::migrate(&db)
        .await
        .context("Failed to run migrations")?;
    info!("Database ready");

    let media = MediaStore::init(&cli.media_root)
        .await
        .context("Failed to prepare media root")?;
    info!("Media root at {}", cli.media_root);

    let config = ApiServerConfig {
        bind_addr: cli.bind,
        enable_cors: !cli.no_cors,
        session_secret: cli.session_secret,
        previous_session_secrets: cli.previous_secrets,
        allow_signup: !cli.disable_signup,
    };

    ApiServer::new(config, db, media).start().await
}
