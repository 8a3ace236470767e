use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub shares: Vec<ShareConfig>,

    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Friendly name announced to clients.
    #[serde(default = "default_name")]
    pub name: String,

    /// Network interface whose address is embedded in item URLs.
    /// When unset, the bind host is used.
    #[serde(default)]
    pub interface: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShareConfig {
    /// Display name of the share container. Defaults to the directory's
    /// final path component.
    #[serde(default)]
    pub name: Option<String>,

    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    #[serde(default)]
    pub enabled: bool,

    /// How long after the last filesystem event to wait before
    /// rebuilding, so bursts of changes coalesce into one rebuild.
    #[serde(default = "default_settle_time")]
    pub settle_time_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    5279
}
fn default_name() -> String {
    "dircast".to_string()
}
fn default_settle_time() -> u64 {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            name: default_name(),
            interface: None,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            settle_time_secs: default_settle_time(),
        }
    }
}

impl ShareConfig {
    /// Resolve to the catalog's share type, defaulting the name to the
    /// directory basename.
    pub fn to_share(&self) -> crate::catalog::Share {
        match &self.name {
            Some(name) => crate::catalog::Share {
                name: name.clone(),
                path: self.path.clone(),
            },
            None => crate::catalog::Share::from_path(self.path.clone()),
        }
    }
}
