//! Shadow copy of the three stores, used as the body of a state push.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::models::{CurrencyAggregate, PriceAggregate, ScheduleAggregate};
use crate::store::{Store, Subscription};

/// Last observed value of each store. A model that was never observed
/// serializes as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppStateSnapshot {
    pub dollar_model: Option<Arc<PriceAggregate>>,
    pub currency_model: Option<Arc<CurrencyAggregate>>,
    pub bot_model: Option<Arc<ScheduleAggregate>>,
}

/// Keeps an [`AppStateSnapshot`] current by subscribing to the stores.
///
/// Price and schedule values are stored as the very `Arc` the store holds.
/// Currency values get their own rates vector (same rate records), so the
/// mirrored table is a distinct sequence from the store's.
#[derive(Default)]
pub struct AppStateMirror {
    snapshot: Arc<Mutex<AppStateSnapshot>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl AppStateMirror {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_snapshot(snapshot: &Mutex<AppStateSnapshot>) -> MutexGuard<'_, AppStateSnapshot> {
        snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscriptions(&self) -> MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to the three stores. Does nothing when already attached.
    pub fn attach(
        &self,
        dollar: &Store<PriceAggregate>,
        currency: &Store<CurrencyAggregate>,
        bot: &Store<ScheduleAggregate>,
    ) {
        let mut subscriptions = self.lock_subscriptions();
        if !subscriptions.is_empty() {
            return;
        }

        let snapshot = Arc::clone(&self.snapshot);
        subscriptions.push(dollar.subscribe(move |dollar_model| {
            Self::lock_snapshot(&snapshot).dollar_model = Some(Arc::clone(dollar_model));
        }));

        let snapshot = Arc::clone(&self.snapshot);
        subscriptions.push(currency.subscribe(move |currency_model| {
            Self::lock_snapshot(&snapshot).currency_model =
                Some(Arc::new(currency_model.shallow_copy()));
        }));

        let snapshot = Arc::clone(&self.snapshot);
        subscriptions.push(bot.subscribe(move |bot_model| {
            Self::lock_snapshot(&snapshot).bot_model = Some(Arc::clone(bot_model));
        }));
    }

    /// Drop the store subscriptions. The last snapshot is kept.
    pub fn detach(&self) {
        let subscriptions: Vec<Subscription> = self.lock_subscriptions().drain(..).collect();
        for subscription in subscriptions {
            subscription.unsubscribe();
        }
    }

    pub fn is_attached(&self) -> bool {
        !self.lock_subscriptions().is_empty()
    }

    pub fn snapshot(&self) -> AppStateSnapshot {
        Self::lock_snapshot(&self.snapshot).clone()
    }
}

impl std::fmt::Debug for AppStateMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppStateMirror")
            .field("snapshot", &*Self::lock_snapshot(&self.snapshot))
            .field("attached", &self.is_attached())
            .finish()
    }
}
