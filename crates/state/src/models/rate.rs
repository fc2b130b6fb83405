use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::IdGenerator;

/// Exchange rate fields as the server sends them, before an identity is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExchangeRate {
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
    pub alias_name: String,
    pub rate: Decimal,
    pub has_manual_rate: bool,
    pub manual_rate: Decimal,
    /// Signed offset added after conversion
    pub adjustment: Decimal,
}

/// An exchange rate row of the dashboard.
///
/// The `uid` is handed out once at construction and is unrelated to the
/// currency code, so two rows may carry the same code. Keeping codes unique is
/// up to whoever builds the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeRate {
    uid: String,
    #[serde(rename = "currencyCode")]
    pub currency_code: String,
    pub alias_name: String,
    pub rate: Decimal,
    pub has_manual_rate: bool,
    pub manual_rate: Decimal,
    pub adjustment: Decimal,
}

impl ExchangeRate {
    pub fn new(ids: &dyn IdGenerator, fields: NewExchangeRate) -> Self {
        Self {
            uid: ids.next_id(),
            currency_code: fields.currency_code,
            alias_name: fields.alias_name,
            rate: fields.rate,
            has_manual_rate: fields.has_manual_rate,
            manual_rate: fields.manual_rate,
            adjustment: fields.adjustment,
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// The manual rate when the override is on, the computed rate otherwise.
    pub fn effective_rate(&self) -> Decimal {
        if self.has_manual_rate {
            self.manual_rate
        } else {
            self.rate
        }
    }

    /// Price of one dollar in this currency: `effective_rate * dollar_price + adjustment`,
    /// truncated toward zero. `None` on decimal overflow.
    pub fn final_price(&self, dollar_price: Decimal) -> Option<Decimal> {
        self.effective_rate()
            .checked_mul(dollar_price)?
            .checked_add(self.adjustment)
            .map(|price| price.trunc())
    }
}

/// State of the currency store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyAggregate {
    /// Codes shown on the dashboard, in display order. May repeat.
    pub selected_currencies: Arc<Vec<String>>,
    pub currency_rates: Vec<Arc<ExchangeRate>>,
}

impl CurrencyAggregate {
    pub fn new(selected_currencies: Vec<String>, currency_rates: Vec<ExchangeRate>) -> Self {
        Self {
            selected_currencies: Arc::new(selected_currencies),
            currency_rates: currency_rates.into_iter().map(Arc::new).collect(),
        }
    }

    /// A new aggregate with its own rates vector holding the same rate records.
    /// The selected currencies are shared, not copied.
    pub fn shallow_copy(&self) -> Self {
        Self {
            selected_currencies: Arc::clone(&self.selected_currencies),
            currency_rates: self.currency_rates.clone(),
        }
    }

    pub fn is_selected(&self, currency_code: &str) -> bool {
        self.selected_currencies
            .iter()
            .any(|code| code == currency_code)
    }

    /// Rates whose currency is selected, in table order.
    pub fn selected_rates(&self) -> impl Iterator<Item = &ExchangeRate> {
        self.currency_rates
            .iter()
            .map(Arc::as_ref)
            .filter(|rate| self.is_selected(&rate.currency_code))
    }
}
