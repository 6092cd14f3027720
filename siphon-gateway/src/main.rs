use std::path::PathBuf;

use axum::routing::get;
use clap::Parser;
use jiff::Timestamp;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use siphon_gateway::ingest::ingest_upload;
use siphon_gateway::{
    AppState, Config, FeedConfig, FeedUpload, IngestStats, MemoryStore, MockDeviceFeed,
    ReadingStore, SqliteStore, StorageConfig, UploadFeed, api,
};

#[derive(Parser)]
#[command(name = "siphon-gateway")]
#[command(about = "Siphon Gateway")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "siphon-gateway.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tracing=info,siphon_gateway=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    info!(http_addr = %config.server.http_addr, "Starting siphon-gateway");

    match config.storage {
        StorageConfig::Memory => {
            info!("Using in-memory store");
            let store = MemoryStore::default();
            run_gateway(config, store).await?;
        }
        StorageConfig::Sqlite { ref path } => {
            info!(path = ?path, "Using SQLite store");
            let store = SqliteStore::new(path).await?;
            run_gateway(config, store).await?;
        }
    }

    Ok(())
}

async fn run_gateway<S>(config: Config, store: S) -> color_eyre::Result<()>
where
    S: ReadingStore + Clone,
{
    let cancel = CancellationToken::new();
    let stats = IngestStats::new();

    // Simulated device feed, when configured
    let mut collector_handle = None;
    if let FeedConfig::Mock {
        ref device_id,
        interval_secs,
    } = config.feed
    {
        info!(device_id = %device_id, interval_secs, "Using mock device feed");

        let feed = MockDeviceFeed::new(device_id.clone(), interval_secs);
        let feed_rx = feed.start(cancel.clone()).await?;

        let store_for_collector = store.clone();
        let stats_for_collector = stats.clone();
        let cancel_for_collector = cancel.clone();
        collector_handle = Some(tokio::spawn(async move {
            run_feed_collector(
                feed_rx,
                store_for_collector,
                stats_for_collector,
                cancel_for_collector,
            )
            .await;
        }));
    }

    let state = AppState { store, stats };

    // HTTP server
    let http_addr = config.server.http_addr;
    let axum_app = api::router()
        .route("/health", get(health_handler))
        .with_state(state);
    let axum_listener = TcpListener::bind(http_addr).await?;
    info!(%http_addr, "HTTP server listening");

    let cancel_for_http = cancel.clone();

    tokio::select! {
        result = axum::serve(axum_listener, axum_app).with_graceful_shutdown(async move {
            cancel_for_http.cancelled().await;
        }) => {
            if let Err(e) = result {
                error!(error = ?e, "HTTP server error");
            }
            info!("HTTP server shut down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            cancel.cancel();
        }
    }

    // Wait for background tasks to complete
    if let Some(handle) = collector_handle {
        let _ = handle.await;
    }

    info!("siphon-gateway shut down complete");
    Ok(())
}

async fn run_feed_collector<S>(
    mut feed_rx: mpsc::Receiver<FeedUpload>,
    store: S,
    stats: IngestStats,
    cancel: CancellationToken,
) where
    S: ReadingStore,
{
    info!("Feed collector started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Feed collector shutting down");
                break;
            }
            Some(upload) = feed_rx.recv() => {
                let device_identity = upload.device_identity.as_deref();
                match ingest_upload(&store, &upload.body, device_identity, Timestamp::now()).await {
                    Ok(ack) => {
                        stats.record_accepted().await;
                        info!(upload_id = ?ack.upload_id, "Stored feed upload");
                    }
                    Err(e) => {
                        stats.record_rejected().await;
                        error!(error = %e, "Failed to ingest feed upload");
                    }
                }
            }
        }
    }
}

async fn health_handler() -> &'static str {
    "OK"
}
