//! Development entry point for the reference server.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use roster_server::network::{HttpModule, ServerConfig};
use roster_server::storage::MemoryStore;

#[derive(Debug, Parser)]
#[command(name = "roster-server", about = "Reference backend for the Roster users collection")]
struct Args {
    /// Bind address.
    #[arg(long, default_value = "0.0.0.0", env = "ROSTER_HOST")]
    host: String,

    /// Port to listen on. 0 means OS-assigned.
    #[arg(long, default_value_t = 4000, env = "ROSTER_PORT")]
    port: u16,

    /// Allowed CORS origin. Repeatable; defaults to any origin.
    #[arg(long = "cors-origin", env = "ROSTER_CORS_ORIGIN")]
    cors_origins: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 30, env = "ROSTER_REQUEST_TIMEOUT_SECS")]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig {
        host: args.host,
        port: args.port,
        request_timeout: Duration::from_secs(args.request_timeout_secs),
        ..ServerConfig::default()
    };
    if !args.cors_origins.is_empty() {
        config.cors_origins = args.cors_origins;
    }

    let mut module = HttpModule::new(config, Arc::new(MemoryStore::new()));
    let port = module.start().await?;
    info!("roster server listening on port {port}");

    module
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
}
