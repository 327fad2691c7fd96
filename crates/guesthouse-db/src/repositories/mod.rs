//! Repository implementations
//!
//! This module contains concrete implementations of the repository traits
//! defined in guesthouse-core, using sqlx for PostgreSQL access.

pub mod check_in_repo;
pub mod guest_repo;

pub use check_in_repo::PgCheckInRepository;
pub use guest_repo::PgGuestRepository;
