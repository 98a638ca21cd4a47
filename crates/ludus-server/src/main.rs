//! Ludus Backend Server
//!
//! HTTP API for student accounts, login sessions, and gameplay metrics.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use ludus_core::tracing_init::init_tracing;
use ludus_server::auth::ApiSecret;
use ludus_server::server::{self, AppState};
use ludus_server::sessions::SessionTracker;
use ludus_server::storage::GameDatabase;

#[derive(Parser, Debug)]
#[command(name = "ludus-server")]
#[command(
    version,
    about = "Ludus backend - student accounts and gameplay metrics API"
)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: SocketAddr,

    /// Path to SQLite database file.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Shared secret required on mutating student endpoints.
    #[arg(long, env = "LUDUS_AUTH_TOKEN")]
    auth_token: String,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing("ludus_server=info", args.log_json);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %args.addr,
        "Starting ludus-server"
    );

    let db_path = match args.db_path {
        Some(path) => path,
        None => default_db_path()?,
    };
    info!(path = %db_path.display(), "Opening game database");
    let db = GameDatabase::open(&db_path).await?;

    let state = AppState::new(db, SessionTracker::new(), ApiSecret::new(args.auth_token));
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, "Ludus server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Ludus server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received shutdown signal");
    }
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".ludus").join("ludus.db"))
}
