//! Shared application state for the asset server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracklet_core::error::Result;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    script_path: PathBuf,
}

impl AppState {
    /// Build application state. Returns Result so main can handle errors
    /// gracefully.
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        cfg.validate()?;

        let script_path = cfg.server.script_path();
        let asset_dir = cfg.server.asset_dir();
        if !asset_dir.is_dir() {
            tracing::warn!(dir = %asset_dir.display(), "asset directory does not exist");
        } else if !script_path.is_file() {
            tracing::warn!(path = %script_path.display(), "collector script missing");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, script_path }),
        })
    }

    pub fn banner(&self) -> &str {
        &self.inner.cfg.server.banner
    }

    pub fn asset_dir(&self) -> &Path {
        self.inner.cfg.server.asset_dir()
    }

    pub fn script_path(&self) -> &Path {
        &self.inner.script_path
    }

    /// Route under which the collector script is served.
    pub fn script_route(&self) -> String {
        format!("/{}", self.inner.cfg.server.script_name)
    }
}
