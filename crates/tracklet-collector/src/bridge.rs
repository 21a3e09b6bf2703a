//! Line-delimited JSON host.
//!
//! The first non-empty line describes the page (`PageEnvironment`), every
//! following line is one `InputEvent`. Input ends the session: the
//! collector is shut down and its counters returned.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use tracklet_core::error::{Result, TrackletError};
use tracklet_core::page::PageEnvironment;

use crate::collector::{Backends, Collector};
use crate::config::CollectorConfig;
use crate::event::InputEvent;
use crate::stats::StatsSnapshot;

pub async fn run<R>(input: R, cfg: &CollectorConfig, backends: Backends) -> Result<StatsSnapshot>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut lineno = 0usize;

    let page = loop {
        let line = next_line(&mut lines).await?.ok_or_else(|| {
            TrackletError::BadConfig("input ended before the page description".into())
        })?;
        lineno += 1;
        if line.trim().is_empty() {
            continue;
        }
        break serde_json::from_str::<PageEnvironment>(&line)
            .map_err(|e| TrackletError::BadConfig(format!("invalid page description: {e}")))?;
    };

    let collector = Collector::activate_with(page, cfg, backends)?;
    let handle = collector.handle();

    while let Some(line) = next_line(&mut lines).await? {
        lineno += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(&line) {
            Ok(ev) => {
                handle.submit(ev).await;
            }
            Err(e) => tracing::warn!(line = lineno, error = %e, "skipping malformed event"),
        }
    }

    collector.shutdown().await;
    Ok(handle.stats())
}

async fn next_line<R>(lines: &mut tokio::io::Lines<R>) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    lines
        .next_line()
        .await
        .map_err(|e| TrackletError::Internal(format!("read input failed: {e}")))
}
