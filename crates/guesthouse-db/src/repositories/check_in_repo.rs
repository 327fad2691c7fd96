//! Check-in repository implementation
//!
//! Provides PostgreSQL-backed storage for check-ins and the per-guest amount
//! aggregates used by the front desk.

use chrono::{DateTime, Utc};
use guesthouse_core::{
    models::CheckIn,
    traits::{CheckInRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

const CHECK_IN_COLUMNS: &str = r#"
    c.id, c.guest_id, c.entry_date, c.departure_date,
    c.additional_vehicle, c.total_cost, c.created_at, c.updated_at
"#;

/// PostgreSQL implementation of CheckInRepository
pub struct PgCheckInRepository {
    pool: PgPool,
}

impl PgCheckInRepository {
    /// Create a new check-in repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<CheckIn, i64> for PgCheckInRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<CheckIn>> {
        debug!("Finding check-in by id: {}", id);

        let query = format!("SELECT {} FROM check_ins c WHERE c.id = $1", CHECK_IN_COLUMNS);
        let result = sqlx::query_as::<sqlx::Postgres, CheckInRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding check-in {}: {}", id, e);
                AppError::Database(format!("Failed to find check-in: {}", e))
            })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<CheckIn>> {
        debug!("Finding all check-ins with limit {} offset {}", limit, offset);

        let query = format!(
            "SELECT {} FROM check_ins c ORDER BY c.entry_date DESC, c.id DESC LIMIT $1 OFFSET $2",
            CHECK_IN_COLUMNS
        );
        let rows = sqlx::query_as::<sqlx::Postgres, CheckInRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding check-ins: {}", e);
                AppError::Database(format!("Failed to fetch check-ins: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM check_ins")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting check-ins: {}", e);
                AppError::Database(format!("Failed to count check-ins: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &CheckIn) -> AppResult<CheckIn> {
        debug!(
            guest_id = entity.guest_id,
            total_cost = %entity.total_cost,
            "Creating check-in"
        );

        let row = sqlx::query_as::<sqlx::Postgres, CheckInRow>(
            r#"
            INSERT INTO check_ins (
                guest_id, entry_date, departure_date, additional_vehicle, total_cost
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                id, guest_id, entry_date, departure_date,
                additional_vehicle, total_cost, created_at, updated_at
            "#,
        )
        .bind(entity.guest_id)
        .bind(entity.entry_date)
        .bind(entity.departure_date)
        .bind(entity.additional_vehicle)
        .bind(entity.total_cost)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating check-in: {}", e);
            AppError::Database(format!("Failed to create check-in: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &CheckIn) -> AppResult<CheckIn> {
        debug!("Updating check-in: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, CheckInRow>(
            r#"
            UPDATE check_ins
            SET guest_id = $2,
                entry_date = $3,
                departure_date = $4,
                additional_vehicle = $5,
                total_cost = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, guest_id, entry_date, departure_date,
                additional_vehicle, total_cost, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(entity.guest_id)
        .bind(entity.entry_date)
        .bind(entity.departure_date)
        .bind(entity.additional_vehicle)
        .bind(entity.total_cost)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating check-in {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update check-in: {}", e))
        })?
        .ok_or_else(|| AppError::CheckInNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting check-in: {}", id);

        let result = sqlx::query("DELETE FROM check_ins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting check-in {}: {}", id, e);
                AppError::Database(format!("Failed to delete check-in: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CheckInRepository for PgCheckInRepository {
    #[instrument(skip(self))]
    async fn find_by_guest_data(&self, data: &str) -> AppResult<Vec<CheckIn>> {
        let query = format!(
            r#"
            SELECT {}
            FROM check_ins c
            JOIN guests g ON g.id = c.guest_id
            WHERE g.name = $1
               OR g.document = $1
               OR g.telephone = $1
            ORDER BY c.entry_date DESC, c.id DESC
            "#,
            CHECK_IN_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, CheckInRow>(&query)
            .bind(data)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error searching check-ins: {}", e);
                AppError::Database(format!("Failed to search check-ins: {}", e))
            })?;

        debug!("Found {} check-ins for guest lookup", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_guest(&self, guest_id: i64) -> AppResult<Vec<CheckIn>> {
        let query = format!(
            "SELECT {} FROM check_ins c WHERE c.guest_id = $1 ORDER BY c.id DESC",
            CHECK_IN_COLUMNS
        );

        let rows = sqlx::query_as::<sqlx::Postgres, CheckInRow>(&query)
            .bind(guest_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error finding check-ins of guest {}: {}", guest_id, e);
                AppError::Database(format!("Failed to fetch guest check-ins: {}", e))
            })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_guest(&self, guest_id: i64) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM check_ins WHERE guest_id = $1")
            .bind(guest_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting check-ins of guest {}: {}", guest_id, e);
                AppError::Database(format!("Failed to count guest check-ins: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self))]
    async fn last_booking_amount(&self, guest_id: i64) -> AppResult<Option<Decimal>> {
        let amount = sqlx::query_scalar::<sqlx::Postgres, Decimal>(
            r#"
            SELECT total_cost
            FROM check_ins
            WHERE guest_id = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(guest_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error reading last booking of guest {}: {}", guest_id, e);
            AppError::Database(format!("Failed to read last booking amount: {}", e))
        })?;

        Ok(amount)
    }

    #[instrument(skip(self))]
    async fn total_amount(&self, guest_id: i64) -> AppResult<Decimal> {
        let total = sqlx::query_scalar::<sqlx::Postgres, Decimal>(
            "SELECT COALESCE(SUM(total_cost), 0) FROM check_ins WHERE guest_id = $1",
        )
        .bind(guest_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error summing bookings of guest {}: {}", guest_id, e);
            AppError::Database(format!("Failed to sum booking amounts: {}", e))
        })?;

        Ok(total)
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CheckInRow {
    id: i64,
    guest_id: i64,
    entry_date: DateTime<Utc>,
    departure_date: DateTime<Utc>,
    additional_vehicle: bool,
    total_cost: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CheckInRow> for CheckIn {
    fn from(row: CheckInRow) -> Self {
        Self {
            id: row.id,
            guest_id: row.guest_id,
            entry_date: row.entry_date,
            departure_date: row.departure_date,
            additional_vehicle: row.additional_vehicle,
            total_cost: row.total_cost,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
