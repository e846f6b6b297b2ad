use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use taskd::server::run_server;
use taskd::store::TaskStore;

/// Single-resource task tracking service over HTTP.
#[derive(Parser)]
#[command(name = "taskd")]
#[command(about = "Task tracking service with an in-memory store")]
#[command(version)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "TASKD_ADDR", default_value = "0.0.0.0:9091")]
    addr: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let store = Arc::new(TaskStore::new());
    info!("Starting task server on {}", cli.addr);

    run_server(store, &cli.addr).await
}
