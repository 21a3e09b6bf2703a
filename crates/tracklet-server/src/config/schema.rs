use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracklet_core::error::{Result, TrackletError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TrackletError::UnsupportedVersion);
        }
        self.server.validate()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory mounted as static files.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,

    /// Collector script served at `/{script_name}`.
    #[serde(default = "default_script_name")]
    pub script_name: String,

    /// Body of `GET /`.
    #[serde(default = "default_banner")]
    pub banner: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            asset_dir: default_asset_dir(),
            script_name: default_script_name(),
            banner: default_banner(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if self.port == 0 {
            return Err(TrackletError::BadConfig("server.port must not be 0".into()));
        }
        if self.asset_dir.as_os_str().is_empty() {
            return Err(TrackletError::BadConfig("server.asset_dir must not be empty".into()));
        }
        let name = &self.script_name;
        let path_like = name.contains(|c: char| c == '/' || c == '\\');
        if name.is_empty() || path_like || name.starts_with('.') {
            return Err(TrackletError::BadConfig(
                "server.script_name must be a plain file name".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            TrackletError::BadConfig(format!("server.host must be an ip address: {e}"))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn script_path(&self) -> PathBuf {
        self.asset_dir.join(&self.script_name)
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    3000
}
fn default_asset_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_script_name() -> String {
    "tracking.js".into()
}
fn default_banner() -> String {
    "tracklet server running".into()
}
