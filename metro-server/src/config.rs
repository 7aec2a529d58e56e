//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable for the listen address.
pub const BIND_ADDR_VAR: &str = "METRO_BIND_ADDR";

/// Environment variable for the network file path.
pub const NETWORK_VAR: &str = "METRO_NETWORK";

/// Environment variable for the static assets directory.
pub const STATIC_DIR_VAR: &str = "METRO_STATIC_DIR";

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to something unparseable
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Configuration for the metro server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// CSV file describing the network.
    pub network_path: PathBuf,

    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        bind_addr: SocketAddr,
        network_path: impl Into<PathBuf>,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            bind_addr,
            network_path: network_path.into(),
            static_dir: static_dir.into(),
        }
    }

    /// Read configuration from the environment, falling back to defaults
    /// for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(BIND_ADDR_VAR) {
            config.bind_addr = value.parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid {
                    var: BIND_ADDR_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup(NETWORK_VAR) {
            config.network_path = non_blank_path(NETWORK_VAR, value)?;
        }

        if let Some(value) = lookup(STATIC_DIR_VAR) {
            config.static_dir = non_blank_path(STATIC_DIR_VAR, value)?;
        }

        Ok(config)
    }
}

fn non_blank_path(var: &'static str, value: String) -> Result<PathBuf, ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            var,
            value,
            reason: "path must not be blank".to_string(),
        });
    }
    Ok(PathBuf::from(value))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            network_path: PathBuf::from("resources/network.csv"),
            static_dir: PathBuf::from("static"),
        }
    }
}
