//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 5000)
//! - `STOREFRONT_BASE_URL` - Public URL used in share links (default: <http://localhost:5000>)
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string; falls back to
//!   `DATABASE_URL`. When neither is set, records are kept in memory.
//! - `STOREFRONT_APP_NAME` - Brand shown in page titles (default: Teteu Cueros)
//! - `STOREFRONT_DEBUG` - Enables the maintenance pages under `/admin` (default: false)
//! - `STOREFRONT_RETENTION_DAYS` - Days a customization stays active (default: 30)
//! - `STOREFRONT_SWEEP_INTERVAL_SECS` - Seconds between expiry sweeps, 0 disables (default: 3600)
//! - `STOREFRONT_MAX_RECORDS` - Active record limit for the in-memory store (default: 1000)
//! - `STOREFRONT_STATIC_DIR` - Static asset root (default: crates/storefront/static)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//! - `LOG_FORMAT` - `text` or `json` (default: text)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the database URL.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for share links
    pub base_url: Url,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Brand name shown in templates
    pub app_name: String,
    /// Enables the maintenance pages
    pub debug: bool,
    /// Days a record stays active before it expires
    pub retention_days: u32,
    /// Period of the background expiry sweep; `None` disables it
    pub sweep_interval: Option<Duration>,
    /// Active record limit for the in-memory store
    pub max_records: usize,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
    /// Log output format
    pub log_format: LogFormat,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url.as_str())
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[REDACTED]"),
            )
            .field("app_name", &self.app_name)
            .field("debug", &self.debug)
            .field("retention_days", &self.retention_days)
            .field("sweep_interval", &self.sweep_interval)
            .field("max_records", &self.max_records)
            .field("static_dir", &self.static_dir)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .field("sentry_environment", &self.sentry_environment)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            base_url: default_base_url(),
            database_url: None,
            app_name: "Teteu Cueros".to_owned(),
            debug: false,
            retention_days: 30,
            sweep_interval: Some(Duration::from_secs(3600)),
            max_records: 1000,
            static_dir: PathBuf::from("crates/storefront/static"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            log_format: LogFormat::Text,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("http://localhost:5000").expect("static base url is valid")
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = parse_or(&get, "STOREFRONT_HOST", defaults.host)?;
        let port = parse_or(&get, "STOREFRONT_PORT", defaults.port)?;
        let base_url = match get("STOREFRONT_BASE_URL") {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.base_url,
        };
        let database_url = get("STOREFRONT_DATABASE_URL")
            .or_else(|| get("DATABASE_URL"))
            .map(SecretString::from);
        let app_name = get("STOREFRONT_APP_NAME").unwrap_or(defaults.app_name);
        let debug = match get("STOREFRONT_DEBUG") {
            Some(raw) => parse_bool("STOREFRONT_DEBUG", &raw)?,
            None => defaults.debug,
        };
        let retention_days = parse_or(&get, "STOREFRONT_RETENTION_DAYS", defaults.retention_days)?;
        let sweep_secs: u64 = parse_or(&get, "STOREFRONT_SWEEP_INTERVAL_SECS", 3600)?;
        let sweep_interval = (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs));
        let max_records = parse_or(&get, "STOREFRONT_MAX_RECORDS", defaults.max_records)?;
        let static_dir = get("STOREFRONT_STATIC_DIR").map_or(defaults.static_dir, PathBuf::from);

        let sentry_sample_rate = parse_or(&get, "SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?;
        let sentry_traces_sample_rate = parse_or(
            &get,
            "SENTRY_TRACES_SAMPLE_RATE",
            defaults.sentry_traces_sample_rate,
        )?;
        let log_format = parse_or(&get, "LOG_FORMAT", defaults.log_format)?;

        Ok(Self {
            host,
            port,
            base_url,
            database_url,
            app_name,
            debug,
            retention_days,
            sweep_interval,
            max_records,
            static_dir,
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Absolute share link for a record.
    #[must_use]
    pub fn share_link(&self, id: impl std::fmt::Display) -> String {
        format!("{}/view/{id}", self.base_url.as_str().trim_end_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if present, otherwise use the default.
fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_owned(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("STOREFRONT_BASE_URL".to_owned(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_BASE_URL".to_owned(),
            "must be an absolute http(s) URL".to_owned(),
        ));
    }
    Ok(url)
}
