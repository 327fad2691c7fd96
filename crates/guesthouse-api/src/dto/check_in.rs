//! Check-in DTOs
//!
//! Request and response types for check-in and quote endpoints.

use chrono::{DateTime, Utc};
use guesthouse_core::models::{CheckIn, Stay, StayQuote};
use guesthouse_services::{CheckInChanges, NewCheckIn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Check-in creation request
///
/// Dates are optional here so that a missing one is reported as a missing
/// date by the pricing rules instead of a body parse failure.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckInCreateRequest {
    #[validate(range(min = 1, message = "guest_id must be positive"))]
    pub guest_id: i64,

    pub entry_date: Option<DateTime<Utc>>,

    pub departure_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub additional_vehicle: bool,
}

impl CheckInCreateRequest {
    pub fn to_new_check_in(&self) -> NewCheckIn {
        NewCheckIn {
            guest_id: self.guest_id,
            stay: Stay {
                entry_date: self.entry_date,
                departure_date: self.departure_date,
                additional_vehicle: self.additional_vehicle,
            },
        }
    }
}

/// Check-in update request; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CheckInUpdateRequest {
    #[validate(range(min = 1, message = "guest_id must be positive"))]
    pub guest_id: Option<i64>,

    pub entry_date: Option<DateTime<Utc>>,

    pub departure_date: Option<DateTime<Utc>>,

    pub additional_vehicle: Option<bool>,
}

impl From<CheckInUpdateRequest> for CheckInChanges {
    fn from(req: CheckInUpdateRequest) -> Self {
        Self {
            guest_id: req.guest_id,
            entry_date: req.entry_date,
            departure_date: req.departure_date,
            additional_vehicle: req.additional_vehicle,
        }
    }
}

/// Quote request, priced without being stored
#[derive(Debug, Clone, Deserialize)]
pub struct StayQuoteRequest {
    pub entry_date: Option<DateTime<Utc>>,

    pub departure_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub additional_vehicle: bool,
}

impl From<StayQuoteRequest> for Stay {
    fn from(req: StayQuoteRequest) -> Self {
        Stay {
            entry_date: req.entry_date,
            departure_date: req.departure_date,
            additional_vehicle: req.additional_vehicle,
        }
    }
}

/// Night breakdown of a quote
#[derive(Debug, Clone, Serialize)]
pub struct NightsResponse {
    pub working_days: u32,
    pub weekend_days: u32,
    pub total: u32,
}

/// Priced stay
#[derive(Debug, Clone, Serialize)]
pub struct StayQuoteResponse {
    pub nights: NightsResponse,

    /// Departure after 16:30 added one night
    pub late_departure: bool,

    pub lodging_total: Decimal,
    pub garage_total: Decimal,
    pub total: Decimal,
}

impl From<StayQuote> for StayQuoteResponse {
    fn from(quote: StayQuote) -> Self {
        Self {
            nights: NightsResponse {
                working_days: quote.nights.working_days,
                weekend_days: quote.nights.weekend_days,
                total: quote.nights.total(),
            },
            late_departure: quote.late_departure,
            lodging_total: quote.lodging_total,
            garage_total: quote.garage_total,
            total: quote.total,
        }
    }
}

/// Check-in response
#[derive(Debug, Clone, Serialize)]
pub struct CheckInResponse {
    pub id: i64,
    pub guest_id: i64,
    pub entry_date: DateTime<Utc>,
    pub departure_date: DateTime<Utc>,
    pub additional_vehicle: bool,
    pub total_cost: Decimal,

    /// Guest is in the hotel right now
    pub in_house: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CheckIn> for CheckInResponse {
    fn from(check_in: CheckIn) -> Self {
        let in_house = check_in.is_active_at(Utc::now());
        Self {
            id: check_in.id,
            guest_id: check_in.guest_id,
            entry_date: check_in.entry_date,
            departure_date: check_in.departure_date,
            additional_vehicle: check_in.additional_vehicle,
            total_cost: check_in.total_cost,
            in_house,
            created_at: check_in.created_at,
            updated_at: check_in.updated_at,
        }
    }
}
