//! scholad - the Nova Schola backend server.

mod bootstrap;
mod proxy;
mod router;
mod routes;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scholad", about = "Nova Schola - AI tutoring platform backend")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Base directory for stored data (defaults to SCHOLA_DATA_DIR or
    /// the platform data directory)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let data_dir = args
        .data_dir
        .or_else(|| std::env::var_os("SCHOLA_DATA_DIR").map(PathBuf::from));

    let ctx = Arc::new(bootstrap::initialize(data_dir.as_deref()).await);
    if ctx.offline() {
        tracing::warn!("[Server] Starting in offline mode");
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let handle = tokio::runtime::Handle::current();
    tokio::task::spawn_blocking(move || router::serve(&addr, ctx, handle)).await??;
    Ok(())
}
