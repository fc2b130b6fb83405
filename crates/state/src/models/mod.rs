//! Value types and aggregates held by the dashboard stores.

mod price;
mod rate;
mod raw;
mod schedule;

pub use price::{PriceAggregate, PriceSample};
pub use rate::{CurrencyAggregate, ExchangeRate, NewExchangeRate};
pub use raw::{RawAppState, RawBotModel, RawCurrencyModel, RawDollarModel};
pub use schedule::{ScheduleAggregate, ScheduleInterval, ScheduleMode};
