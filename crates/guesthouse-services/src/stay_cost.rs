//! Stay cost calculation
//!
//! Prices a stay night by night. Each calendar day between arrival and
//! departure is classified as a working day or a weekend day in the hotel's
//! time zone, then the rate table is applied to the two counts.
//!
//! Rules:
//! - the walk always bills the arrival day, so a same-day stay costs one night
//! - a departure strictly after 16:30 local time bills exactly one more night,
//!   taken one step past where the walk stopped
//! - the garage rate follows the same split and is charged only when the
//!   guest brings a vehicle

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use guesthouse_core::config::BillingConfig;
use guesthouse_core::models::{DayKind, NightBuckets, RateTable, Stay, StayQuote};
use guesthouse_core::{AppError, AppResult};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Departures later than this (seconds after local midnight, 16:30) are charged an extra night
pub const LATE_DEPARTURE_CUTOFF_SECS: u32 = 16 * 3600 + 30 * 60;

/// Default upper bound on the number of days walked for one stay
pub const DEFAULT_MAX_STAY_NIGHTS: u32 = 366;

/// Step used to move the walk cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStep {
    /// One calendar day (24 hours) in the hotel's time zone
    Day,
}

impl DayStep {
    /// Move `date` forward by this step
    pub fn advance(self, date: NaiveDate) -> AppResult<NaiveDate> {
        match self {
            DayStep::Day => date
                .succ_opt()
                .ok_or_else(|| AppError::InvalidInput(format!("date {} is out of range", date))),
        }
    }
}

/// Check that both dates are present and departure comes after entry
pub fn validate_stay(stay: &Stay) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let entry = stay
        .entry_date
        .ok_or_else(|| AppError::MissingDate("entry_date is required".to_string()))?;
    let departure = stay
        .departure_date
        .ok_or_else(|| AppError::MissingDate("departure_date is required".to_string()))?;

    if departure <= entry {
        return Err(AppError::InvalidStayInterval(format!(
            "departure {} must be after entry {}",
            departure.to_rfc3339(),
            entry.to_rfc3339()
        )));
    }

    Ok((entry, departure))
}

/// Whether a local time of day falls strictly after the 16:30 cutoff
#[inline]
pub fn is_late_departure<T: Timelike>(local_time: &T) -> bool {
    let secs = local_time.num_seconds_from_midnight();
    secs > LATE_DEPARTURE_CUTOFF_SECS
        || (secs == LATE_DEPARTURE_CUTOFF_SECS && local_time.nanosecond() > 0)
}

/// Stay cost calculator
///
/// Holds the rate table and the time zone in which days are counted. Both are
/// fixed at construction, so one instance can be shared by every request.
#[derive(Debug, Clone)]
pub struct StayCostCalculator {
    rates: RateTable,
    time_zone: Tz,
    max_nights: u32,
}

impl StayCostCalculator {
    /// Create a calculator with the default stay length bound
    pub fn new(rates: RateTable, time_zone: Tz) -> Self {
        Self {
            rates,
            time_zone,
            max_nights: DEFAULT_MAX_STAY_NIGHTS,
        }
    }

    /// Override the stay length bound
    pub fn with_max_nights(mut self, max_nights: u32) -> Self {
        self.max_nights = max_nights;
        self
    }

    /// Build the calculator from the billing section of the configuration
    pub fn from_config(config: &BillingConfig) -> AppResult<Self> {
        Ok(Self::new(config.rate_table()?, config.time_zone()?)
            .with_max_nights(config.max_stay_nights))
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Total cost of a stay with the configured rates
    pub fn compute_total(&self, stay: &Stay) -> AppResult<Decimal> {
        self.compute_total_with(stay, &self.rates)
    }

    /// Total cost of a stay with an explicit rate table
    pub fn compute_total_with(&self, stay: &Stay, rates: &RateTable) -> AppResult<Decimal> {
        Ok(self.quote_with(stay, rates)?.total)
    }

    /// Priced stay with its night breakdown, using the configured rates
    pub fn quote(&self, stay: &Stay) -> AppResult<StayQuote> {
        self.quote_with(stay, &self.rates)
    }

    /// Priced stay with its night breakdown
    #[instrument(level = "debug", skip(self, rates))]
    pub fn quote_with(&self, stay: &Stay, rates: &RateTable) -> AppResult<StayQuote> {
        let (entry, departure) = validate_stay(stay)?;
        let (nights, late_departure) = self.bucket_nights(entry, departure)?;

        let lodging_total = rates.lodging_cost(&nights);
        let garage_total = if stay.additional_vehicle {
            rates.garage_cost(&nights)
        } else {
            Decimal::ZERO
        };
        let total = lodging_total + garage_total;

        debug!(
            working_days = nights.working_days,
            weekend_days = nights.weekend_days,
            late_departure,
            %total,
            "Stay priced"
        );

        Ok(StayQuote {
            nights,
            late_departure,
            lodging_total,
            garage_total,
            total,
        })
    }

    /// Count billed nights per day class
    ///
    /// Returns the buckets and whether the late-departure night was added.
    /// Callers are expected to have checked that `departure > entry`.
    pub fn bucket_nights(
        &self,
        entry: DateTime<Utc>,
        departure: DateTime<Utc>,
    ) -> AppResult<(NightBuckets, bool)> {
        let local_departure = departure.with_timezone(&self.time_zone);
        let start_day = entry.with_timezone(&self.time_zone).date_naive();
        let end_day = local_departure.date_naive();

        let span = (end_day - start_day).num_days();
        if span > i64::from(self.max_nights) {
            return Err(AppError::StayTooLong {
                nights: span,
                max: self.max_nights,
            });
        }

        let mut nights = NightBuckets::default();
        let mut cursor = start_day;
        loop {
            nights.record(DayKind::of(cursor));
            cursor = DayStep::Day.advance(cursor)?;
            if cursor >= end_day {
                break;
            }
        }

        let late_departure = is_late_departure(&local_departure.time());
        if late_departure {
            cursor = DayStep::Day.advance(cursor)?;
            nights.record(DayKind::of(cursor));
        }

        Ok((nights, late_departure))
    }
}

impl Default for StayCostCalculator {
    fn default() -> Self {
        Self::new(RateTable::default(), chrono_tz::America::Sao_Paulo)
    }
}
