use std::net::SocketAddr;
use thiserror::Error;

pub const BIND_ADDR_VAR: &str = "MANGO_BIND_ADDR";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "mango_music=debug,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {var} value '{value}': {source}")]
    InvalidBindAddress {
        var: &'static str,
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Runtime settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let raw_address = read(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_address =
            raw_address
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidBindAddress {
                    var: BIND_ADDR_VAR,
                    value: raw_address.clone(),
                    source,
                })?;

        Ok(Self {
            bind_address,
            database_url: read(DATABASE_URL_VAR),
        })
    }
}
