//! Domain models for the guesthouse backend
//!
//! This module contains all the core domain models used throughout the application.

pub mod check_in;
pub mod guest;
pub mod rate;
pub mod stay;

pub use check_in::CheckIn;
pub use guest::Guest;
pub use rate::RateTable;
pub use stay::{DayKind, NightBuckets, Stay, StayQuote};
