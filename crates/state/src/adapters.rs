//! Adapters from server-shaped records to store aggregates.
//!
//! Adapters are pure: they borrow the raw record, build fresh values and never
//! touch the input.

use std::cmp::Ordering;

use crate::ids::IdGenerator;
use crate::models::{
    CurrencyAggregate, ExchangeRate, PriceAggregate, PriceSample, RawBotModel, RawCurrencyModel,
    RawDollarModel, ScheduleAggregate, ScheduleInterval,
};

/// Dollar price state with historic prices sorted newest first.
pub fn dollar_store_data_adapter(dollar_model: &RawDollarModel) -> PriceAggregate {
    // Built back to front before the stable sort, so equal timestamps end up
    // in reverse server order.
    let mut historic_prices: Vec<PriceSample> = dollar_model
        .historic_prices
        .iter()
        .rev()
        .map(|sample| PriceSample::new(sample.price, sample.timestamp))
        .collect();
    historic_prices.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let current = &dollar_model.current_price;
    PriceAggregate {
        current_price: PriceSample::new(current.price, current.timestamp),
        historic_prices,
    }
}

pub fn schedule_store_data_adapter(bot_model: &RawBotModel) -> ScheduleAggregate {
    ScheduleAggregate {
        disabled: bot_model.disabled,
        on_time: bot_model.on_time,
        on_change: bot_model.on_change,
        interval: ScheduleInterval::new(bot_model.interval.unit.clone(), bot_model.interval.value),
    }
}

/// Currency state with every rate given a fresh identity and the table sorted
/// by currency code.
pub fn currency_store_data_adapter(
    currency_model: &RawCurrencyModel,
    ids: &dyn IdGenerator,
) -> CurrencyAggregate {
    let mut currency_rates: Vec<ExchangeRate> = currency_model
        .currency_rates
        .iter()
        .rev()
        .map(|fields| ExchangeRate::new(ids, fields.clone()))
        .collect();
    currency_rates.sort_by(|a, b| locale_cmp(&a.currency_code, &b.currency_code));

    CurrencyAggregate::new(currency_model.selected_currencies.clone(), currency_rates)
}

/// Collation order for display strings.
///
/// Letters compare case-insensitively first; when two strings only differ in
/// case, lowercase sorts before uppercase. Ordering is by lowercased code
/// point, which matches locale collation for ASCII (currency codes) only:
/// accented letters sort after `z` rather than next to their base letter.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| b.cmp(a))
}
