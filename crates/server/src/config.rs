use std::{env, net::SocketAddr};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("invalid listen address {0}")]
    InvalidAddress(String),
}

/// Runtime settings, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = var("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = var("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());

        let addr = format!("{host}:{port}");
        let addr = addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(addr))?;

        Ok(Self { database_url, addr })
    }
}
