use std::time::Duration;

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How often the rate bot broadcasts when it runs on a fixed interval.
///
/// `unit` is an open set of tokens. Only `Min`, `Hour` and `Day` map to a
/// period; anything else is kept as is and simply has no period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInterval {
    pub unit: String,
    pub value: Decimal,
}

impl ScheduleInterval {
    pub const MINUTES: &'static str = "Min";
    pub const HOURS: &'static str = "Hour";
    pub const DAYS: &'static str = "Day";

    pub fn new(unit: impl Into<String>, value: Decimal) -> Self {
        Self {
            unit: unit.into(),
            value,
        }
    }

    pub fn period(&self) -> Option<Duration> {
        let unit_secs: u32 = match self.unit.as_str() {
            Self::MINUTES => 60,
            Self::HOURS => 60 * 60,
            Self::DAYS => 24 * 60 * 60,
            _ => return None,
        };
        if self.value <= Decimal::ZERO {
            return None;
        }
        let secs = self.value.checked_mul(Decimal::from(unit_secs))?.to_f64()?;
        Duration::try_from_secs_f64(secs).ok()
    }
}

/// State of the bot schedule store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleAggregate {
    pub disabled: bool,
    #[serde(rename = "onTime")]
    pub on_time: bool,
    #[serde(rename = "onChange")]
    pub on_change: bool,
    pub interval: ScheduleInterval,
}

/// What the bot should do under a given schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleMode {
    Disabled,
    /// Broadcast whenever the server state changes
    OnChange,
    /// Broadcast on a fixed interval
    Interval(ScheduleInterval),
    Idle,
}

impl ScheduleAggregate {
    /// Trigger selection. `disabled` wins, then `onChange`, then `onTime`.
    pub fn mode(&self) -> ScheduleMode {
        if self.disabled {
            ScheduleMode::Disabled
        } else if self.on_change {
            ScheduleMode::OnChange
        } else if self.on_time {
            ScheduleMode::Interval(self.interval.clone())
        } else {
            ScheduleMode::Idle
        }
    }
}
