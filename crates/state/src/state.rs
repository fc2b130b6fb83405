use std::sync::Arc;

use rust_decimal_macros::dec;

use crate::adapters::{
    currency_store_data_adapter, dollar_store_data_adapter, schedule_store_data_adapter,
};
use crate::ids::{IdGenerator, UuidIdGenerator};
use crate::mirror::{AppStateMirror, AppStateSnapshot};
use crate::models::{
    CurrencyAggregate, ExchangeRate, NewExchangeRate, PriceAggregate, PriceSample, RawAppState,
    ScheduleAggregate, ScheduleInterval,
};
use crate::store::Store;

/// The dashboard's state context: the three stores, the mirror used for
/// pushes and the identity generator used when rates are rebuilt.
///
/// Lives for as long as the application does. Attach the mirror with
/// [`start_updating_app_state`](Self::start_updating_app_state) at startup.
pub struct DashboardState {
    dollar: Store<PriceAggregate>,
    currency: Store<CurrencyAggregate>,
    bot: Store<ScheduleAggregate>,
    mirror: AppStateMirror,
    ids: Arc<dyn IdGenerator>,
}

impl DashboardState {
    /// Seeded state with random rate identities.
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidIdGenerator))
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            dollar: Store::new(seed_dollar_state()),
            currency: Store::new(seed_currency_state(ids.as_ref())),
            bot: Store::new(seed_bot_state()),
            mirror: AppStateMirror::new(),
            ids,
        }
    }

    pub fn dollar_store(&self) -> &Store<PriceAggregate> {
        &self.dollar
    }

    pub fn currency_store(&self) -> &Store<CurrencyAggregate> {
        &self.currency
    }

    pub fn bot_store(&self) -> &Store<ScheduleAggregate> {
        &self.bot
    }

    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.ids.as_ref()
    }

    pub fn start_updating_app_state(&self) {
        self.mirror.attach(&self.dollar, &self.currency, &self.bot);
    }

    pub fn stop_updating_app_state(&self) {
        self.mirror.detach();
    }

    pub fn snapshot(&self) -> AppStateSnapshot {
        self.mirror.snapshot()
    }

    /// Adapt a server state and replace all three stores with it, price first,
    /// then schedule, then currency.
    pub fn apply_raw_state(&self, raw: &RawAppState) {
        let dollar_state = dollar_store_data_adapter(&raw.dollar_model);
        let bot_state = schedule_store_data_adapter(&raw.bot_model);
        let currency_state = currency_store_data_adapter(&raw.currency_model, self.ids.as_ref());

        self.dollar.replace(dollar_state);
        self.bot.replace(bot_state);
        self.currency.replace(currency_state);
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardState")
            .field("dollar", &self.dollar)
            .field("currency", &self.currency)
            .field("bot", &self.bot)
            .field("mirror", &self.mirror)
            .finish()
    }
}

fn seed_dollar_state() -> PriceAggregate {
    PriceAggregate {
        current_price: PriceSample::new(dec!(48285), 1679161352),
        historic_prices: vec![
            PriceSample::new(dec!(47895), 1679218971),
            PriceSample::new(dec!(48890), 1679118971),
        ],
    }
}

fn seed_currency_state(ids: &dyn IdGenerator) -> CurrencyAggregate {
    CurrencyAggregate::new(
        vec!["EUR".to_string(), "TRY".to_string()],
        vec![
            ExchangeRate::new(
                ids,
                NewExchangeRate {
                    currency_code: "EUR".to_string(),
                    alias_name: "EUR".to_string(),
                    rate: dec!(1.05),
                    has_manual_rate: false,
                    manual_rate: dec!(1),
                    adjustment: dec!(500),
                },
            ),
            ExchangeRate::new(
                ids,
                NewExchangeRate {
                    currency_code: "TRY".to_string(),
                    alias_name: "TRY".to_string(),
                    rate: dec!(19.01),
                    has_manual_rate: true,
                    manual_rate: dec!(19.5),
                    adjustment: dec!(-200),
                },
            ),
        ],
    )
}

fn seed_bot_state() -> ScheduleAggregate {
    ScheduleAggregate {
        disabled: false,
        on_time: true,
        on_change: false,
        interval: ScheduleInterval::new(ScheduleInterval::MINUTES, dec!(2)),
    }
}
