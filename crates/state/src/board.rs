//! Rate board: what one dollar costs in each selected currency.

use std::fmt::Write as _;

use log::warn;
use rust_decimal::Decimal;

use crate::models::{CurrencyAggregate, PriceAggregate};

/// Direction of a board price compared to an earlier board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Unchanged,
}

impl Trend {
    fn between(previous: Decimal, current: Decimal) -> Self {
        if current > previous {
            Trend::Up
        } else if current < previous {
            Trend::Down
        } else {
            Trend::Unchanged
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Unchanged => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardEntry {
    pub alias_name: String,
    /// Integral price of one dollar
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateBoard {
    entries: Vec<BoardEntry>,
}

impl RateBoard {
    /// Price every selected rate at the current dollar price, in table order.
    ///
    /// Entries are keyed by alias: a repeated alias keeps its first position
    /// and takes the later price.
    pub fn from_aggregates(dollar: &PriceAggregate, currency: &CurrencyAggregate) -> Self {
        let dollar_price = dollar.current_price.price;
        let mut entries: Vec<BoardEntry> = Vec::new();

        for rate in currency.selected_rates() {
            let Some(price) = rate.final_price(dollar_price) else {
                warn!(
                    "Skipping {} on the rate board: price overflows",
                    rate.currency_code
                );
                continue;
            };
            match entries
                .iter_mut()
                .find(|entry| entry.alias_name == rate.alias_name)
            {
                Some(entry) => entry.price = price,
                None => entries.push(BoardEntry {
                    alias_name: rate.alias_name.clone(),
                    price,
                }),
            }
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[BoardEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn price_of(&self, alias_name: &str) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|entry| entry.alias_name == alias_name)
            .map(|entry| entry.price)
    }

    /// Trend of each entry against `previous`. Entries with nothing to compare
    /// against are `Unchanged`.
    pub fn trends(&self, previous: Option<&RateBoard>) -> Vec<Trend> {
        self.entries
            .iter()
            .map(|entry| {
                previous
                    .and_then(|board| board.price_of(&entry.alias_name))
                    .map_or(Trend::Unchanged, |before| {
                        Trend::between(before, entry.price)
                    })
            })
            .collect()
    }

    /// One `"{arrow} {alias}: {price}"` line per entry.
    pub fn render(&self, previous: Option<&RateBoard>) -> String {
        let mut out = String::new();
        for (entry, trend) in self.entries.iter().zip(self.trends(previous)) {
            let _ = writeln!(
                out,
                "{} {}: {}",
                trend.arrow(),
                entry.alias_name,
                group_thousands(entry.price)
            );
        }
        out
    }
}

fn group_thousands(value: Decimal) -> String {
    let digits = value.trunc().abs().normalize().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value.is_sign_negative() && !value.trunc().is_zero() {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
