//! Configuration types for hello-worker.
//!
//! Config is loaded once at startup from an optional TOML file and validated
//! before the server opens its port. Every key has a default, so a missing
//! file is equivalent to an empty one. A file that exists but cannot be read
//! or parsed is rejected with a clear error rather than silently ignored.
//!
//! # Example
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [log]
//! level  = "info"
//! format = "json"
//! ```

use std::{
    io::ErrorKind,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_ENV: &str = "HELLO_WORKER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hello-worker/config.toml";

/// Top-level worker configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load the config named by `HELLO_WORKER_CONFIG`, or the default path.
    ///
    /// Returns the path that was consulted alongside the config.
    pub fn from_env() -> anyhow::Result<(PathBuf, Self)> {
        Self::resolve(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// An explicit path must exist; the default path is optional.
    fn resolve(explicit: Option<PathBuf>) -> anyhow::Result<(PathBuf, Self)> {
        let (path, config) = match explicit {
            Some(path) => {
                let config = Self::load(&path);
                (path, config)
            }
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                let config = Self::load_or_default(&path);
                (path, config)
            }
        };
        let config =
            config.with_context(|| format!("Failed to load config from {}", path.display()))?;
        Ok((path, config))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Like [`Config::load`], but a file that does not exist yields defaults.
    ///
    /// Any other I/O failure (permissions, path is a directory) is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.socket_addr()?;

        if let Some(level) = &self.log.level {
            anyhow::ensure!(!level.trim().is_empty(), "[log] level must not be empty");
        }

        Ok(())
    }

    /// The address the HTTP listener binds to.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .with_context(|| format!("[server] host `{}` is not an IP address", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`). Must be an IPv4 or IPv6 literal.
    #[serde(default = "defaults::host")]
    pub host: String,

    /// Bind port (default: 8000).
    #[serde(default = "defaults::port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
        }
    }
}

/// Logging settings. `RUST_LOG` always wins over `level`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub format: LogFormat,
}

/// Shape of each emitted log line.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// Newline-delimited JSON, one object per event.
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

mod defaults {
    pub fn host() -> String { "0.0.0.0".into() }
    pub fn port() -> u16 { 8000 }
}
