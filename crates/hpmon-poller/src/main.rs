use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use hpmon_config::{init_tracing, ConfigLoader};
use hpmon_modbus::ModbusClient;
use hpmon_poller::{PollError, Poller};
use hpmon_storage::HistoryStore;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read one snapshot from the heat pump and persist it", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "hpmon.toml")]
    config: String,

    /// Print the snapshot instead of saving it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigLoader::new(&args.config)
        .load()
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    init_tracing(&config.logging);

    tracing::info!(
        config = %args.config,
        endpoint = %config.modbus.endpoint(),
        "Starting acquisition cycle"
    );

    let mut client = ModbusClient::new(config.modbus.clone());
    client.connect().await.map_err(PollError::Connect)?;

    let store = HistoryStore::new(&config.storage.path, config.storage.capacity);
    let poller = Poller::new(store, config.device.clone());

    if args.dry_run {
        let assembly = poller.collect(&mut client, Utc::now()).await?;
        println!("{}", serde_json::to_string_pretty(&assembly.snapshot)?);
        for failure in &assembly.failures {
            eprintln!("{} (register {}): {}", failure.field, failure.address, failure.error);
        }
    } else {
        poller.run_cycle(&mut client, Utc::now()).await?;
    }

    client.disconnect();
    Ok(())
}
