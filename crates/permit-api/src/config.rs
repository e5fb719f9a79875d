//! # Service Configuration
//!
//! [`AppConfig`] is read once at startup from the environment. Unset
//! variables take their defaults; present but invalid values are a
//! [`ConfigError`] so a mistyped deployment fails fast.
//!
//! | Variable                | Default     |
//! |-------------------------|-------------|
//! | `PORT`                  | `8080`      |
//! | `DATABASE_URL`          | unset (in-memory store) |
//! | `DATABASE_NAME`         | `permit_db` |
//! | `BROKER_URL`            | unset (accepted, unused) |
//! | `SWEEP_INTERVAL_SECS`   | `60`        |
//! | `EXPIRY_THRESHOLD_SECS` | `300`       |
//! | `LOG_FORMAT`            | `text`      |

use std::time::Duration;

use thiserror::Error;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default database name applied on top of `DATABASE_URL`.
pub const DEFAULT_DATABASE_NAME: &str = "permit_db";
/// Default sweep period.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Errors raised while reading configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A duration variable was zero.
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected \"text\" or \"json\", got {other:?}")),
        }
    }
}

/// Resolved service configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP bind port.
    pub port: u16,
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Database name applied on top of `database_url`.
    pub database_name: String,
    /// Message broker URL. Accepted for compatibility; the sweep runs on an
    /// in-process timer.
    pub broker_url: Option<String>,
    /// Period between sweeps.
    pub sweep_interval: Duration,
    /// Grace period for pending permits.
    pub expiry_threshold: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            broker_url: None,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            expiry_threshold: permit_state::DEFAULT_EXPIRY_THRESHOLD,
            log_format: LogFormat::Text,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => parse_var("PORT", &raw)?,
            None => defaults.port,
        };

        let sweep_interval = match non_empty("SWEEP_INTERVAL_SECS") {
            Some(raw) => parse_secs("SWEEP_INTERVAL_SECS", &raw)?,
            None => defaults.sweep_interval,
        };

        let expiry_threshold = match non_empty("EXPIRY_THRESHOLD_SECS") {
            Some(raw) => parse_secs("EXPIRY_THRESHOLD_SECS", &raw)?,
            None => defaults.expiry_threshold,
        };

        let log_format = match non_empty("LOG_FORMAT") {
            Some(raw) => parse_var("LOG_FORMAT", &raw)?,
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            database_url: non_empty("DATABASE_URL"),
            database_name: non_empty("DATABASE_NAME").unwrap_or(defaults.database_name),
            broker_url: non_empty("BROKER_URL"),
            sweep_interval,
            expiry_threshold,
            log_format,
        })
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_secs(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_var(var, raw)?;
    if secs == 0 {
        return Err(ConfigError::Zero { var });
    }
    Ok(Duration::from_secs(secs))
}

/// Connection strings may carry credentials, so Debug prints only whether
/// they are set.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &redact(&self.database_url))
            .field("database_name", &self.database_name)
            .field("broker_url", &redact(&self.broker_url))
            .field("sweep_interval", &self.sweep_interval)
            .field("expiry_threshold", &self.expiry_threshold)
            .field("log_format", &self.log_format)
            .finish()
    }
}
