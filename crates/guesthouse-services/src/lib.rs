//! Business logic services for the guesthouse backend
//!
//! This crate holds the stay pricing rules and the service that applies
//! them when check-ins are stored.
//!
//! # Architecture
//!
//! - `StayCostCalculator` is pure and synchronous; it is built once from
//!   configuration and shared behind an `Arc`
//! - `CheckInService` owns its repositories and the calculator, and every
//!   async operation is instrumented with tracing
//! - All failures are reported as `AppError`

pub mod check_in;
pub mod stay_cost;

pub use check_in::{CheckInChanges, CheckInService, NewCheckIn};
pub use stay_cost::{validate_stay, DayStep, StayCostCalculator};
