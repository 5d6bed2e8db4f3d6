use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::filter::SiteSelection;
use crate::models::LogLimit;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9000";
pub const DEFAULT_REFRESH_MS: u64 = 5000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DEVICE_ID: &str = "HR-01";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
    pub log_limit: LogLimit,
    pub site: SiteSelection,
    pub device_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_limit: LogLimit::default(),
            site: SiteSelection::All,
            device_id: DEFAULT_DEVICE_ID.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_limit = match lookup("GATEWATCH_LOG_LIMIT") {
            Some(raw) => raw
                .parse::<LogLimit>()
                .map_err(anyhow::Error::msg)
                .context("GATEWATCH_LOG_LIMIT")?,
            None => LogLimit::default(),
        };
        Ok(Self {
            base_url: lookup("GATEWATCH_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            refresh_interval: Duration::from_millis(
                lookup("GATEWATCH_REFRESH_MS")
                    .and_then(|v| v.parse().ok())
                    .filter(|ms| *ms > 0)
                    .unwrap_or(DEFAULT_REFRESH_MS),
            ),
            http_timeout: Duration::from_secs(
                lookup("GATEWATCH_HTTP_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
            log_limit,
            site: lookup("GATEWATCH_SITE")
                .map(|s| SiteSelection::parse(&s))
                .unwrap_or_default(),
            device_id: lookup("GATEWATCH_DEVICE_ID").unwrap_or_else(|| DEFAULT_DEVICE_ID.to_string()),
        })
    }
}
