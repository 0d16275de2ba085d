//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_NAME` - Shop name shown in the header and on receipts
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted cart (default: ./data)
//! - `STOREFRONT_MENU_PATH` - JSON menu file replacing the built-in menu
//! - `STOREFRONT_CLOSE_POLICY` - `clear` or `keep`: what closing a bill does to the cart (default: clear)
//! - `STOREFRONT_SYNC_INTERVAL_MS` - How often to check for cart changes made elsewhere (default: 1000, 0 disables)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use warung_core::ClosePolicy;

const DEFAULT_STORE_NAME: &str = "Warung Cepat Saji";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shop name for page headers and receipts
    pub store_name: String,
    /// Directory for file-backed cart storage
    pub data_dir: PathBuf,
    /// Optional menu file; the built-in menu is used when absent
    pub menu_path: Option<PathBuf>,
    /// What closing a bill does to the cart
    pub close_policy: ClosePolicy,
    /// Poll interval for external cart changes (`None` disables polling)
    pub sync_interval: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            store_name: DEFAULT_STORE_NAME.to_string(),
            data_dir: PathBuf::from("data"),
            menu_path: None,
            close_policy: ClosePolicy::default(),
            sync_interval: Some(Duration::from_millis(1000)),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let store_name = get_optional_env("STOREFRONT_NAME").unwrap_or(defaults.store_name);
        let data_dir = get_optional_env("STOREFRONT_DATA_DIR")
            .map_or(defaults.data_dir, PathBuf::from);
        let menu_path = get_optional_env("STOREFRONT_MENU_PATH").map(PathBuf::from);
        let close_policy = parse_close_policy(
            get_optional_env("STOREFRONT_CLOSE_POLICY").as_deref(),
        )?;
        let sync_interval = parse_sync_interval(
            get_optional_env("STOREFRONT_SYNC_INTERVAL_MS").as_deref(),
        )?;

        Ok(Self {
            host,
            port,
            store_name,
            data_dir,
            menu_path,
            close_policy,
            sync_interval,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: parse_rate(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_close_policy(value: Option<&str>) -> Result<ClosePolicy, ConfigError> {
    value.map_or(Ok(ClosePolicy::default()), |raw| {
        ClosePolicy::parse(raw).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "STOREFRONT_CLOSE_POLICY".to_string(),
                format!("expected 'clear' or 'keep', got '{raw}'"),
            )
        })
    })
}

fn parse_sync_interval(value: Option<&str>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = value else {
        return Ok(StorefrontConfig::default().sync_interval);
    };
    let millis = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("STOREFRONT_SYNC_INTERVAL_MS".to_string(), e.to_string())
    })?;
    Ok((millis > 0).then(|| Duration::from_millis(millis)))
}

fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}
