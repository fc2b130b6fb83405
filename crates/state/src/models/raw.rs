//! Server-shaped records, as returned by `GET /api/get_state`.

use serde::Deserialize;

use super::{NewExchangeRate, PriceSample, ScheduleInterval};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAppState {
    pub dollar_model: RawDollarModel,
    pub bot_model: RawBotModel,
    pub currency_model: RawCurrencyModel,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDollarModel {
    pub current_price: PriceSample,
    pub historic_prices: Vec<PriceSample>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawBotModel {
    pub disabled: bool,
    #[serde(rename = "onTime")]
    pub on_time: bool,
    #[serde(rename = "onChange")]
    pub on_change: bool,
    pub interval: ScheduleInterval,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCurrencyModel {
    pub selected_currencies: Vec<String>,
    pub currency_rates: Vec<NewExchangeRate>,
}
