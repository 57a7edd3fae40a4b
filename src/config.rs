use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::quotes::DEFAULT_QUOTE_API_URL;

#[derive(Debug, thiserror::Error)]
#[error("invalid {name}: {message}")]
pub struct ConfigError {
    name: &'static str,
    message: String,
}

/// Runtime settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub quote_api_url: Url,
    pub quote_timeout: Duration,
    pub prefs_path: PathBuf,
    pub share_command: Option<String>,
    pub notify_command: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse(
            "BIND_ADDR",
            var("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
        )?;
        let quote_api_url = parse(
            "QUOTE_API_URL",
            var("QUOTE_API_URL").unwrap_or_else(|| DEFAULT_QUOTE_API_URL.to_string()),
        )?;
        let quote_timeout_secs: u64 = parse(
            "QUOTE_TIMEOUT_SECS",
            var("QUOTE_TIMEOUT_SECS").unwrap_or_else(|| "10".to_string()),
        )?;

        Ok(Self {
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:data/dailyquotes.db".to_string()),
            bind_addr,
            quote_api_url,
            quote_timeout: Duration::from_secs(quote_timeout_secs),
            prefs_path: var("PREFS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/prefs.json")),
            share_command: var("SHARE_COMMAND"),
            notify_command: var("NOTIFY_COMMAND"),
        })
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError {
        name,
        message: format!("{value:?}: {e}"),
    })
}
