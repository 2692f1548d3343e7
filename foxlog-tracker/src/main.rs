//! `foxlog-tracker` entry point.
//!
//! Runs until the war enters its resistance phase (exit 0) or a fatal error
//! occurs (exit 1).

use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use foxlog_api::HttpWarApi;
use foxlog_core::config::FoxlogConfig;
use foxlog_core::sink::CsvEventSink;
use foxlog_tracker::{Halt, SystemClock, Tracker};

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    setup_logging(&config.logging.level)?;

    let api = HttpWarApi::new(&config.api).context("building war service client")?;
    let sink = CsvEventSink::new(&config.tracker.output_dir);
    tracing::info!(
        base_url = api.base_url(),
        output_dir = %sink.output_dir().display(),
        poll_interval_secs = config.tracker.poll_interval().as_secs(),
        "Starting foxlog tracker"
    );

    let mut tracker = Tracker::new(api, sink, SystemClock, config.tracker.poll_interval());
    match tracker.run().await? {
        Halt::ResistanceAtStart => tracing::info!("War already in resistance; nothing to track"),
        Halt::ResistancePhase => tracing::info!("Tracking finished at resistance phase"),
    }
    Ok(())
}

/// Config file from `FOXLOG_CONFIG` (optional), then environment overrides.
fn load_config() -> Result<FoxlogConfig> {
    let config = match std::env::var_os("FOXLOG_CONFIG") {
        Some(path) => {
            let path = Path::new(&path);
            FoxlogConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?
        }
        None => FoxlogConfig::default(),
    };
    Ok(config.with_env_overrides())
}

/// Stderr logging; `RUST_LOG` wins over the configured level.
fn setup_logging(level: &str) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level {level:?}"))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}
