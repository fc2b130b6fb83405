use std::time::Duration;

/// Address of the dashboard server when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:7777";

/// Connection settings for [`crate::SyncClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Base URL of the dashboard server, without a trailing slash
    pub server_url: String,
    /// Per-request timeout. `None` leaves the HTTP client's defaults in place.
    pub request_timeout: Option<Duration>,
}

impl SyncConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL)
    }
}
