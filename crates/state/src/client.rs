//! Sync client for the dashboard server.
//!
//! Pulls the full server state into the stores and pushes the mirrored state
//! back. Both directions always move whole models; there is no diffing, no
//! retry and no authentication.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::models::RawAppState;
use crate::state::DashboardState;

const GET_STATE_PATH: &str = "/api/get_state";
const SEND_STATE_PATH: &str = "/api/send_state";

/// Client that keeps a [`DashboardState`] in sync with the dashboard server.
#[derive(Debug, Clone)]
pub struct SyncClient {
    client: reqwest::Client,
    config: SyncConfig,
    state: Arc<DashboardState>,
}

impl SyncClient {
    /// Create a client for `config.server_url`, driving `state`.
    pub fn new(config: &SyncConfig, state: Arc<DashboardState>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config, state))
    }

    /// Create a client on top of an existing `reqwest::Client`.
    pub fn with_client(
        client: reqwest::Client,
        config: &SyncConfig,
        state: Arc<DashboardState>,
    ) -> Self {
        Self {
            client,
            config: config.clone(),
            state,
        }
    }

    pub fn state(&self) -> &Arc<DashboardState> {
        &self.state
    }

    pub fn server_url(&self) -> &str {
        &self.config.server_url
    }

    /// Fetch the server state as raw JSON.
    ///
    /// A non-success status is logged and the body is parsed anyway.
    ///
    /// GET /api/get_state
    pub async fn get_state_from_server(&self) -> Result<Value> {
        let url = self.config.endpoint(GET_STATE_PATH);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                "State request failed: {} ({})",
                status.canonical_reason().unwrap_or("Unknown Status"),
                status.as_u16()
            );
        }

        let body = response.text().await?;
        debug!("API response ({}): {}", status, body);

        Ok(serde_json::from_str(&body)?)
    }

    /// Pull the server state and replace the dollar, bot and currency stores
    /// with it, in that order. Returns the raw JSON the server sent.
    ///
    /// The stores are only touched once the whole response has been decoded,
    /// so a failed pull leaves them as they were.
    pub async fn reload_state_from_server(&self) -> Result<Value> {
        info!("Getting state from server");
        let raw_state = self.get_state_from_server().await?;

        let parsed = RawAppState::deserialize(&raw_state)?;
        self.state.apply_raw_state(&parsed);

        Ok(raw_state)
    }

    /// Post the mirrored state to the server. The outcome is not inspected and
    /// failures are dropped.
    ///
    /// POST /api/send_state
    pub async fn send_state_to_server(&self) {
        info!("Sending state to server");
        let url = self.config.endpoint(SEND_STATE_PATH);
        let snapshot = self.state.snapshot();

        let _ = self.client.post(&url).json(&snapshot).send().await;
    }
}
