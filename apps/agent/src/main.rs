mod bot;
mod config;

use std::sync::Arc;

use exchange_dashboard_state::{DashboardState, SyncClient};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bot::RateBot;
use config::{Config, LogFormat};

fn init_tracing(log_format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    let state = Arc::new(DashboardState::new());
    state.start_updating_app_state();

    let client = SyncClient::new(&config.sync, state)?;
    RateBot::new(client).run(config.poll_interval).await;
    Ok(())
}
