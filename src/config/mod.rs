mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::net::IpAddr;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./dircast.toml",
        "~/.config/dircast/config.toml",
        "/etc/dircast/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration.
///
/// An empty share list or an unusable port is fatal at startup: a
/// content-directory server with nothing to serve has nothing to do.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.shares.is_empty() {
        anyhow::bail!("No shares configured; add at least one [[shares]] entry");
    }

    for share in &config.shares {
        if !share.path.is_dir() {
            tracing::warn!("Share path does not exist: {:?}", share.path);
        }
    }

    Ok(())
}

/// The address clients should use to reach this server, embedded in item
/// URLs.
///
/// Prefers the configured interface's address; falls back to the bind
/// host, substituting loopback when bound to the wildcard address. An
/// unusable configured interface is a startup failure.
pub fn announce_ip(server: &ServerConfig) -> Result<IpAddr> {
    if let Some(iface) = &server.interface {
        return interface_addr(iface)
            .with_context(|| format!("Network interface {:?} is unusable", iface));
    }

    let host: IpAddr = server
        .host
        .parse()
        .with_context(|| format!("Invalid bind host: {:?}", server.host))?;

    if host.is_unspecified() {
        tracing::warn!("Bound to the wildcard address; item URLs will use loopback");
        Ok(IpAddr::V4(std::net::Ipv4Addr::LOCALHOST))
    } else {
        Ok(host)
    }
}

#[cfg(unix)]
fn interface_addr(name: &str) -> Result<IpAddr> {
    let addrs = nix::ifaddrs::getifaddrs().context("Failed to enumerate interfaces")?;
    for ifaddr in addrs {
        if ifaddr.interface_name != name {
            continue;
        }
        if let Some(addr) = ifaddr.address {
            if let Some(sin) = addr.as_sockaddr_in() {
                return Ok(IpAddr::V4(sin.ip()));
            }
        }
    }
    anyhow::bail!("No IPv4 address on interface {:?}", name)
}

#[cfg(not(unix))]
fn interface_addr(name: &str) -> Result<IpAddr> {
    anyhow::bail!("Interface selection is not supported on this platform: {:?}", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str(
            r#"
            [[shares]]
            path = "/srv/media/movies"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5279);
        assert_eq!(config.shares.len(), 1);
        assert!(config.shares[0].name.is_none());
        assert!(!config.watch.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "192.168.1.10"
            port = 9000
            name = "living-room"

            [[shares]]
            name = "Movies"
            path = "/srv/media/movies"

            [[shares]]
            path = "/srv/media/music"

            [watch]
            enabled = true
            settle_time_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.name, "living-room");
        assert_eq!(config.shares.len(), 2);
        assert_eq!(config.shares[0].name.as_deref(), Some("Movies"));
        assert!(config.watch.enabled);
        assert_eq!(config.watch.settle_time_secs, 5);
    }

    #[test]
    fn test_validate_rejects_empty_shares() {
        let config = Config::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_port_zero() {
        let mut config: Config = toml::from_str(
            r#"
            [[shares]]
            path = "/tmp"
            "#,
        )
        .unwrap();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_share_name_resolution() {
        let share = ShareConfig {
            name: None,
            path: "/srv/media/movies".into(),
        };
        assert_eq!(share.to_share().name, "movies");

        let share = ShareConfig {
            name: Some("Films".to_string()),
            path: "/srv/media/movies".into(),
        };
        assert_eq!(share.to_share().name, "Films");
    }

    #[test]
    fn test_announce_ip_falls_back_to_loopback_on_wildcard() {
        let server = ServerConfig::default();
        let ip = announce_ip(&server).unwrap();
        assert!(ip.is_loopback());
    }

    #[test]
    fn test_announce_ip_uses_bind_host() {
        let server = ServerConfig {
            host: "192.168.1.10".to_string(),
            ..Default::default()
        };
        assert_eq!(announce_ip(&server).unwrap().to_string(), "192.168.1.10");
    }
}
