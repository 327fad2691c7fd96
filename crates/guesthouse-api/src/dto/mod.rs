//! Data Transfer Objects (DTOs) for API requests and responses

pub mod check_in;
pub mod common;
pub mod guest;

pub use check_in::*;
pub use common::*;
pub use guest::*;
