//! Stay model
//!
//! A stay is the interval a guest spends at the hotel. It carries no identity
//! of its own; it is the input handed to the stay-cost calculator.

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stay to be priced
///
/// Dates are optional so that an absent date can be reported as such
/// instead of being replaced by a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub entry_date: Option<DateTime<Utc>>,
    pub departure_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub additional_vehicle: bool,
}

impl Stay {
    pub fn new(
        entry_date: DateTime<Utc>,
        departure_date: DateTime<Utc>,
        additional_vehicle: bool,
    ) -> Self {
        Self {
            entry_date: Some(entry_date),
            departure_date: Some(departure_date),
            additional_vehicle,
        }
    }
}

/// Billing class of a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    /// Monday to Friday
    Weekday,
    /// Saturday and Sunday
    Weekend,
}

impl DayKind {
    /// Classify a calendar day
    ///
    /// The date must already be expressed in the hotel's time zone.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }
}

/// Billed nights grouped by day class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NightBuckets {
    pub working_days: u32,
    pub weekend_days: u32,
}

impl NightBuckets {
    /// Count one night of the given class
    #[inline]
    pub fn record(&mut self, kind: DayKind) {
        match kind {
            DayKind::Weekday => self.working_days += 1,
            DayKind::Weekend => self.weekend_days += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> u32 {
        self.working_days + self.weekend_days
    }
}

/// Priced stay with its breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayQuote {
    pub nights: NightBuckets,
    /// Whether departure after the cutoff added one night
    pub late_departure: bool,
    pub lodging_total: Decimal,
    pub garage_total: Decimal,
    pub total: Decimal,
}
