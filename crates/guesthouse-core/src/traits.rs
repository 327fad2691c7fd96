//! Common traits for repositories
//!
//! Defines the data-access abstractions implemented by the database layer.

use crate::error::AppError;
use crate::models::{CheckIn, Guest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Guest repository trait with lookup methods
#[async_trait]
pub trait GuestRepository: Repository<Guest, i64> {
    /// Find guests whose name, document or telephone equals `data`
    async fn find_by_data(&self, data: &str) -> Result<Vec<Guest>, AppError>;

    /// Guests with at least one check-in that ended before `now`
    async fn find_past(&self, now: DateTime<Utc>) -> Result<Vec<Guest>, AppError>;

    /// Guests with a check-in in progress at `now`
    async fn find_current(&self, now: DateTime<Utc>) -> Result<Vec<Guest>, AppError>;
}

/// Check-in repository trait with per-guest queries
#[async_trait]
pub trait CheckInRepository: Repository<CheckIn, i64> {
    /// Check-ins of guests whose name, document or telephone equals `data`
    async fn find_by_guest_data(&self, data: &str) -> Result<Vec<CheckIn>, AppError>;

    /// All check-ins of a guest, newest first
    async fn find_by_guest(&self, guest_id: i64) -> Result<Vec<CheckIn>, AppError>;

    /// Number of check-ins of a guest
    async fn count_by_guest(&self, guest_id: i64) -> Result<i64, AppError>;

    /// Cost of the guest's most recent check-in
    async fn last_booking_amount(&self, guest_id: i64) -> Result<Option<Decimal>, AppError>;

    /// Sum of all check-in costs of a guest (zero when none)
    async fn total_amount(&self, guest_id: i64) -> Result<Decimal, AppError>;
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
