//! Server config loader (strict parsing, env overrides).

pub mod schema;

use std::fs;
use std::path::Path;

use tracklet_core::error::{Result, TrackletError};

pub use schema::{ServerConfig, ServerSection};

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

pub fn load_from_file(path: &str) -> Result<ServerConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TrackletError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| TrackletError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Config file if present, defaults otherwise, then `PORT` from the
/// environment.
pub fn load(path: &str) -> Result<ServerConfig> {
    let mut cfg = if Path::new(path).exists() {
        load_from_file(path)?
    } else {
        tracing::info!(%path, "no config file, using defaults");
        ServerConfig::default()
    };
    apply_port_override(&mut cfg, std::env::var(PORT_ENV).ok().as_deref())?;
    Ok(cfg)
}

pub fn apply_port_override(cfg: &mut ServerConfig, raw: Option<&str>) -> Result<()> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(());
    };
    cfg.server.port = raw.parse().map_err(|e| {
        TrackletError::BadConfig(format!("{PORT_ENV}={raw} is not a valid port: {e}"))
    })?;
    cfg.validate()
}
