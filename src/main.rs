use clap::Parser;
use flightsurety::application::app::SuretyApp;
use flightsurety::config::SuretyConfig;
use flightsurety::domain::ports::LedgerStoreBox;
use flightsurety::infrastructure::in_memory::InMemoryLedgerStore;
use flightsurety::infrastructure::transfer::RecordingTransfer;
use flightsurety::interfaces::csv::call_reader::CallReader;
use flightsurety::interfaces::csv::ledger_writer::LedgerWriter;
use flightsurety::interfaces::replay::dispatch;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file of ledger calls to replay
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// JSON configuration file (optional). Unset keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn open_store(db_path: Option<PathBuf>) -> Result<LedgerStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = flightsurety::infrastructure::rocksdb::RocksDBStore::open(path)
                .into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(path) => {
            warn!(
                path = %path.display(),
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryLedgerStore::new()))
        }
        None => Ok(Box::new(InMemoryLedgerStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => SuretyConfig::from_file(path).into_diagnostic()?,
        None => SuretyConfig::default(),
    };
    let store = open_store(cli.db_path)?;
    let app = SuretyApp::deploy(store, config).await.into_diagnostic()?;
    let transfer = RecordingTransfer::new();

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = CallReader::new(file);
    for call_result in reader.calls() {
        match call_result {
            Ok(call) => match dispatch(&app, &transfer, &call).await {
                Ok(summary) => info!("{}", summary),
                Err(e) => warn!(op = ?call.op, caller = %call.caller, "Call rejected: {}", e),
            },
            Err(e) => {
                warn!("Error reading call: {}", e);
            }
        }
    }

    let data = app.data();
    let airlines = data.airlines().await.into_diagnostic()?;
    let mut flights = Vec::new();
    for id in data.flight_ids().await.into_diagnostic()? {
        if let Some(flight) = data.flight(&id).await.into_diagnostic()? {
            flights.push(flight);
        }
    }
    let passengers = data.passengers().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = LedgerWriter::new(stdout.lock());
    writer
        .write_ledger(&airlines, &flights, &passengers)
        .into_diagnostic()?;

    Ok(())
}
