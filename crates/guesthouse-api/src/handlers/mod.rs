//! HTTP request handlers

pub mod check_in;
pub mod guest;
pub mod health;

pub use check_in::configure as configure_check_ins;
pub use guest::configure as configure_guests;
pub use health::health_check;
