use anyhow::{Context, Result};
use clap::Parser;
use hpmon_api::{create_router, AppState, FaultCodeTable, QueryService, SnapshotSource};
use hpmon_config::{init_tracing, ConfigLoader};
use hpmon_storage::HistoryStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the heat-pump snapshot history over HTTP", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "hpmon.toml")]
    config: String,

    /// Serve synthetic data instead of the stored record
    #[arg(long)]
    test: bool,

    /// Listen address, overrides server.host/server.port
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigLoader::new(&args.config)
        .load()
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    init_tracing(&config.logging);

    let source = if args.test {
        tracing::warn!("Running in test mode, serving synthetic data");
        SnapshotSource::Synthetic
    } else {
        SnapshotSource::Durable(HistoryStore::new(
            &config.storage.path,
            config.storage.capacity,
        ))
    };

    let fault_codes = FaultCodeTable::load(&config.server.fault_codes_path).await;
    let state = AppState::new(QueryService::new(source, fault_codes));
    let app = create_router(state, config.server.dashboard_dir.as_deref());

    let addr = args.bind.unwrap_or_else(|| config.server.bind_address());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Query service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Query service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
