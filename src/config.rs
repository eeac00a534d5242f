//! Runtime configuration loaded from the environment (and an optional `.env` file).
//!
//! | Variable               | Default                          |
//! |------------------------|----------------------------------|
//! | `AQI_API_BASE_URL`     | `http://192.168.43.173:5000/api` |
//! | `AQI_API_TIMEOUT_SECS` | `10`                             |
//! | `AQI_DAY_ZONE`         | `utc`                            |
//! | `AQI_LOG_FORMAT`       | `pretty` (or `json`)             |
//! | `AQI_LOG_DIR`          | unset (no log file)              |

use crate::error::{AppError, Result};
use crate::history::DayZone;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://192.168.43.173:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings for the HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// When set, logs also go to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub day_zone: DayZone,
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup; unset or blank keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("AQI_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "AQI_API_BASE_URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let timeout_secs = match get("AQI_API_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().ok().filter(|s| *s > 0).ok_or_else(|| {
                AppError::Config(format!(
                    "AQI_API_TIMEOUT_SECS must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let day_zone = match get("AQI_DAY_ZONE") {
            Some(raw) => raw.parse()?,
            None => DayZone::default(),
        };

        let format = match get("AQI_LOG_FORMAT").map(|f| f.trim().to_ascii_lowercase()) {
            None => LogFormat::Pretty,
            Some(f) if f == "pretty" => LogFormat::Pretty,
            Some(f) if f == "json" => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "AQI_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    other
                )))
            },
        };

        let config = Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            day_zone,
            log: LogConfig {
                format,
                directory: get("AQI_LOG_DIR").map(PathBuf::from),
            },
        };
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Applies a `--zone` flag on top of the environment value.
    pub fn with_zone_override(mut self, zone: Option<&str>) -> Result<Self> {
        if let Some(raw) = zone {
            self.day_zone = raw.parse()?;
        }
        Ok(self)
    }
}
