//! Check-in model
//!
//! A check-in records one stay of a guest together with its billed cost.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::stay::Stay;

/// Check-in entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    /// Unique identifier
    pub id: i64,

    /// Guest staying
    pub guest_id: i64,

    /// Arrival timestamp
    pub entry_date: DateTime<Utc>,

    /// Departure timestamp
    pub departure_date: DateTime<Utc>,

    /// Guest parks a vehicle in the garage
    pub additional_vehicle: bool,

    /// Billed amount, computed when the check-in is saved
    pub total_cost: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl CheckIn {
    /// The stay this check-in covers
    pub fn stay(&self) -> Stay {
        Stay::new(self.entry_date, self.departure_date, self.additional_vehicle)
    }

    /// Guest is in the hotel at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.entry_date < now && self.departure_date > now
    }

    /// Guest already left at `now`
    pub fn is_past_at(&self, now: DateTime<Utc>) -> bool {
        self.departure_date < now
    }
}

impl Default for CheckIn {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            guest_id: 0,
            entry_date: now,
            departure_date: now,
            additional_vehicle: false,
            total_cost: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}
