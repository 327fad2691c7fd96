//! Rate table model
//!
//! Nightly prices for lodging and garage, each split between working days
//! and weekend days.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::AppError;
use crate::models::stay::NightBuckets;
use crate::AppResult;

/// Decimal places a rate may carry
pub const RATE_SCALE: u32 = 2;

/// Rate table
///
/// Immutable once built: the constructor rejects negative amounts and amounts
/// finer than cents, matching the two-place `total_cost` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateTable {
    daily_working_day: Decimal,
    daily_weekend: Decimal,
    garage_working_day: Decimal,
    garage_weekend: Decimal,
}

impl RateTable {
    /// Build a validated rate table
    pub fn new(
        daily_working_day: Decimal,
        daily_weekend: Decimal,
        garage_working_day: Decimal,
        garage_weekend: Decimal,
    ) -> AppResult<Self> {
        let table = Self {
            daily_working_day,
            daily_weekend,
            garage_working_day,
            garage_weekend,
        };
        table.validate()?;
        Ok(table)
    }

    /// Build a rate table where any rate may be absent
    ///
    /// Used by the configuration layer; a `None` is reported by field name.
    pub fn from_parts(
        daily_working_day: Option<Decimal>,
        daily_weekend: Option<Decimal>,
        garage_working_day: Option<Decimal>,
        garage_weekend: Option<Decimal>,
    ) -> AppResult<Self> {
        let require = |value: Option<Decimal>, field: &str| {
            value.ok_or_else(|| AppError::InvalidRateTable(format!("{} is missing", field)))
        };

        Self::new(
            require(daily_working_day, "daily_working_day")?,
            require(daily_weekend, "daily_weekend")?,
            require(garage_working_day, "garage_working_day")?,
            require(garage_weekend, "garage_weekend")?,
        )
    }

    fn validate(&self) -> AppResult<()> {
        let fields = [
            ("daily_working_day", self.daily_working_day),
            ("daily_weekend", self.daily_weekend),
            ("garage_working_day", self.garage_working_day),
            ("garage_weekend", self.garage_weekend),
        ];

        for (name, value) in fields {
            if value < Decimal::ZERO {
                return Err(AppError::InvalidRateTable(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
            if value.normalize().scale() > RATE_SCALE {
                return Err(AppError::InvalidRateTable(format!(
                    "{} must have at most {} decimal places (got {})",
                    name, RATE_SCALE, value
                )));
            }
        }

        Ok(())
    }

    #[inline]
    pub fn daily_working_day(&self) -> Decimal {
        self.daily_working_day
    }

    #[inline]
    pub fn daily_weekend(&self) -> Decimal {
        self.daily_weekend
    }

    #[inline]
    pub fn garage_working_day(&self) -> Decimal {
        self.garage_working_day
    }

    #[inline]
    pub fn garage_weekend(&self) -> Decimal {
        self.garage_weekend
    }

    /// Lodging cost for a set of billed nights
    pub fn lodging_cost(&self, nights: &NightBuckets) -> Decimal {
        Decimal::from(nights.working_days) * self.daily_working_day
            + Decimal::from(nights.weekend_days) * self.daily_weekend
    }

    /// Garage cost for a set of billed nights
    ///
    /// Priced per night with the same working/weekend split as lodging.
    pub fn garage_cost(&self, nights: &NightBuckets) -> Decimal {
        Decimal::from(nights.working_days) * self.garage_working_day
            + Decimal::from(nights.weekend_days) * self.garage_weekend
    }
}

impl Default for RateTable {
    /// The house price list: 120/150 per night, 15/20 per night of parking
    fn default() -> Self {
        Self {
            daily_working_day: Decimal::from(120),
            daily_weekend: Decimal::from(150),
            garage_working_day: Decimal::from(15),
            garage_weekend: Decimal::from(20),
        }
    }
}
