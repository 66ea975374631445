use serde::Deserialize;
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/rhuanvictor/power_bi_analyst/main/Financial%20Sample.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source_url: String,
    pub sheet_name: String,
    pub bind_addr: SocketAddr,
    pub max_file_size: usize,
    pub fetch_timeout: Duration,
    pub session_idle: Duration,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_file_size: default_max_file_size(),
            fetch_timeout: Duration::from_secs(30),
            session_idle: Duration::from_secs(3600),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let defaults = Config::default();
        Ok(Config {
            source_url: env_or("DASHBOARD_SOURCE_URL", defaults.source_url)?,
            sheet_name: env_or("DASHBOARD_SHEET_NAME", defaults.sheet_name)?,
            bind_addr: env_or("DASHBOARD_BIND_ADDR", defaults.bind_addr)?,
            max_file_size: env_or("DASHBOARD_MAX_FILE_SIZE", defaults.max_file_size)?,
            fetch_timeout: Duration::from_secs(env_or(
                "DASHBOARD_FETCH_TIMEOUT_SECS",
                defaults.fetch_timeout.as_secs(),
            )?),
            session_idle: Duration::from_secs(env_or(
                "DASHBOARD_SESSION_IDLE_SECS",
                defaults.session_idle.as_secs(),
            )?),
            log_filter: env_or("DASHBOARD_LOG_FILTER", defaults.log_filter)?,
        })
    }
}

pub fn load_config() -> Result<Config> {
    Config::new()
}

/// Logged once the subscriber exists.
pub fn log_config(config: &Config) {
    tracing::info!(
        "Configured source {} (sheet {}), max file size {}KB, log filter {:?}",
        config.source_url,
        config.sheet_name,
        config.max_file_size / 1024,
        config.log_filter
    );
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, raw.trim()),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("Failed to parse {}={:?}", key, raw))
}
