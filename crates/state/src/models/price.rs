use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A dollar price observed at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: Decimal,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
}

impl PriceSample {
    pub fn new(price: Decimal, timestamp: i64) -> Self {
        Self { price, timestamp }
    }

    /// The timestamp as a UTC datetime, if it is within chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// State of the dollar price store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceAggregate {
    pub current_price: PriceSample,
    /// Newest first once the state came through the adapter
    pub historic_prices: Vec<PriceSample>,
}
