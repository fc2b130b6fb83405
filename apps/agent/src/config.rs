use std::time::Duration;

use anyhow::{Context, Result};
use exchange_dashboard_state::{SyncConfig, DEFAULT_SERVER_URL};

/// Refresh cadence when `DASHBOARD_POLL_INTERVAL_MS` is not set.
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub sync: SyncConfig,
    pub poll_interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_url =
            lookup("DASHBOARD_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut sync = SyncConfig::new(server_url);

        if let Some(raw) = lookup("DASHBOARD_REQUEST_TIMEOUT_MS") {
            let timeout_ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid DASHBOARD_REQUEST_TIMEOUT_MS: {raw}"))?;
            sync = sync.with_request_timeout(Duration::from_millis(timeout_ms));
        }

        let poll_interval_ms: u64 = match lookup("DASHBOARD_POLL_INTERVAL_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid DASHBOARD_POLL_INTERVAL_MS: {raw}"))?,
            None => DEFAULT_POLL_INTERVAL_MS,
        };
        anyhow::ensure!(
            poll_interval_ms > 0,
            "DASHBOARD_POLL_INTERVAL_MS must be positive"
        );

        let log_format = match lookup("DASHBOARD_LOG_FORMAT") {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            sync,
            poll_interval: Duration::from_millis(poll_interval_ms),
            log_format,
        })
    }
}
