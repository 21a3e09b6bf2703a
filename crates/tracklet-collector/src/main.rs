use std::process::ExitCode;

use tokio::io::BufReader;
use tracing_subscriber::{fmt, EnvFilter};

use tracklet_collector::{bridge, config, Backends};
use tracklet_core::error::Result;

/// Config path when no argument is given.
const DEFAULT_CONFIG: &str = "tracklet-collector.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    // stdout stays free for the host; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "collector failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = config::load_from_file(&path)?;
    tracing::info!(%path, endpoint = %cfg.collector.endpoint, "config loaded");

    let backends = Backends::http(&cfg.collector)?;
    let stats = bridge::run(BufReader::new(tokio::io::stdin()), &cfg, backends).await?;
    tracing::info!(
        delivered = stats.flushes_delivered,
        failed = stats.flushes_failed,
        dropped = stats.events_dropped,
        "input closed"
    );
    Ok(())
}
