//! Rate bot loop: follows the server state and broadcasts the rate board
//! according to the bot schedule.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use exchange_dashboard_state::{RateBoard, ScheduleInterval, ScheduleMode, SyncClient};
use serde_json::Value;
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// What to do with the interval broadcast timer after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TimerChange {
    Keep,
    Cancel,
    Arm(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Decision {
    broadcast_now: bool,
    timer: TimerChange,
}

pub struct RateBot {
    client: SyncClient,
    previous_raw: Option<Value>,
    armed_interval: Option<ScheduleInterval>,
    last_board: Option<RateBoard>,
}

impl RateBot {
    pub fn new(client: SyncClient) -> Self {
        Self {
            client,
            previous_raw: None,
            armed_interval: None,
            last_board: None,
        }
    }

    /// Poll the server every `poll_interval` until Ctrl-C.
    pub async fn run(mut self, poll_interval: Duration) {
        info!(
            "Rate bot following {} every {:?}",
            self.client.server_url(),
            poll_interval
        );

        let mut poll = interval(poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut broadcast_timer: Option<Interval> = None;
        // One listener for the whole run; a Ctrl-C during a pull is not lost.
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    let Some(refreshed) = unless_shutdown(self.refresh(), shutdown.as_mut()).await else {
                        info!("Shutting down rate bot");
                        break;
                    };
                    let Some(decision) = refreshed else {
                        continue;
                    };
                    if decision.broadcast_now {
                        self.broadcast();
                    }
                    match decision.timer {
                        TimerChange::Keep => {}
                        TimerChange::Cancel => {
                            if broadcast_timer.take().is_some() {
                                info!("Cancelling pending interval broadcasts");
                            }
                        }
                        TimerChange::Arm(period) => {
                            info!("Scheduling interval broadcasts every {:?}", period);
                            broadcast_timer = Some(interval_at(Instant::now() + period, period));
                        }
                    }
                }
                _ = next_tick(&mut broadcast_timer) => self.broadcast(),
                _ = &mut shutdown => {
                    info!("Shutting down rate bot");
                    break;
                }
            }
        }

        self.client.state().stop_updating_app_state();
    }

    async fn refresh(&mut self) -> Option<Decision> {
        match self.client.reload_state_from_server().await {
            Ok(raw) => Some(self.on_refreshed(raw)),
            Err(e) => {
                warn!("Failed to refresh state from server: {}", e);
                None
            }
        }
    }

    fn on_refreshed(&mut self, raw: Value) -> Decision {
        let changed = self.previous_raw.as_ref() != Some(&raw);
        self.previous_raw = Some(raw);

        let mode = self.client.state().bot_store().current().mode();
        debug!("Schedule mode after refresh: {:?}", mode);

        let mut decision = Decision {
            broadcast_now: false,
            timer: TimerChange::Keep,
        };

        match mode {
            ScheduleMode::Interval(schedule) => {
                if self.armed_interval.as_ref() != Some(&schedule) {
                    info!("Interval changed, rescheduling");
                    decision.timer = match schedule.period() {
                        Some(period) => TimerChange::Arm(period),
                        None => {
                            warn!(
                                "No period for interval {} {}; interval broadcasts stay off",
                                schedule.value, schedule.unit
                            );
                            TimerChange::Cancel
                        }
                    };
                    self.armed_interval = Some(schedule);
                }
            }
            other => {
                if self.armed_interval.take().is_some() {
                    decision.timer = TimerChange::Cancel;
                }
                decision.broadcast_now = other == ScheduleMode::OnChange && changed;
            }
        }

        decision
    }

    fn broadcast(&mut self) {
        let state = self.client.state();
        let board = RateBoard::from_aggregates(
            &state.dollar_store().current(),
            &state.currency_store().current(),
        );
        if board.is_empty() {
            debug!("Rate board is empty, nothing to broadcast");
            return;
        }

        info!("Rate board:\n{}", board.render(self.last_board.as_ref()));
        self.last_board = Some(board);
    }
}

/// Run `work` to completion unless `shutdown` resolves first.
async fn unless_shutdown<W, S>(work: W, shutdown: Pin<&mut S>) -> Option<W::Output>
where
    W: Future,
    S: Future,
{
    tokio::select! {
        output = work => Some(output),
        _ = shutdown => None,
    }
}

async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
