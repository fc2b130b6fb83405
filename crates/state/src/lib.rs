//! Exchange Dashboard State - client-side state for the exchange dashboard.
//!
//! This crate holds the observable state of the dashboard (the dollar price
//! series, the exchange rate table and the rate bot schedule) and keeps it in
//! sync with the dashboard server over plain JSON endpoints.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use exchange_dashboard_state::{DashboardState, SyncClient, SyncConfig};
//!
//! let state = Arc::new(DashboardState::new());
//! state.start_updating_app_state();
//!
//! let client = SyncClient::new(&SyncConfig::default(), state.clone())?;
//! client.reload_state_from_server().await?;
//! client.send_state_to_server().await;
//! ```

mod adapters;
mod board;
mod client;
mod config;
mod error;
mod ids;
mod mirror;
mod state;
mod store;

pub mod models;

pub use adapters::{
    currency_store_data_adapter, dollar_store_data_adapter, locale_cmp, schedule_store_data_adapter,
};
pub use board::{BoardEntry, RateBoard, Trend};
pub use client::SyncClient;
pub use config::{SyncConfig, DEFAULT_SERVER_URL};
pub use error::{Result, SyncError};
pub use ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use mirror::{AppStateMirror, AppStateSnapshot};
pub use models::*;
pub use state::DashboardState;
pub use store::{Store, Subscription};
