//! Guest repository implementation
//!
//! Provides PostgreSQL-backed storage for guests, with exact-match lookups
//! on name, document and telephone and stay-status queries joined against
//! check-ins.

use chrono::{DateTime, Utc};
use guesthouse_core::{
    models::Guest,
    traits::{GuestRepository, Repository},
    AppError, AppResult,
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

/// PostgreSQL implementation of GuestRepository
pub struct PgGuestRepository {
    pool: PgPool,
}

impl PgGuestRepository {
    /// Create a new guest repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Guest, i64> for PgGuestRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Guest>> {
        debug!("Finding guest by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            SELECT id, name, document, telephone, created_at, updated_at
            FROM guests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding guest {}: {}", id, e);
            AppError::Database(format!("Failed to find guest: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Guest>> {
        debug!("Finding all guests with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            SELECT id, name, document, telephone, created_at, updated_at
            FROM guests
            ORDER BY name, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding guests: {}", e);
            AppError::Database(format!("Failed to fetch guests: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guests")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting guests: {}", e);
                AppError::Database(format!("Failed to count guests: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Guest) -> AppResult<Guest> {
        debug!("Creating guest: {}", entity.name);

        let row = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            INSERT INTO guests (name, document, telephone)
            VALUES ($1, $2, $3)
            RETURNING id, name, document, telephone, created_at, updated_at
            "#,
        )
        .bind(&entity.name)
        .bind(&entity.document)
        .bind(&entity.telephone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating guest: {}", e);
            AppError::Database(format!("Failed to create guest: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Guest) -> AppResult<Guest> {
        debug!("Updating guest: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            UPDATE guests
            SET name = $2,
                document = $3,
                telephone = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, document, telephone, created_at, updated_at
            "#,
        )
        .bind(entity.id)
        .bind(&entity.name)
        .bind(&entity.document)
        .bind(&entity.telephone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating guest {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update guest: {}", e))
        })?
        .ok_or_else(|| AppError::GuestNotFound(entity.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        debug!("Deleting guest: {}", id);

        let result = sqlx::query("DELETE FROM guests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // A check-in registered after the caller's count still blocks the delete
                if e
                    .as_database_error()
                    .map_or(false, |db| db.is_foreign_key_violation())
                {
                    warn!("Guest {} still has check-ins", id);
                    return AppError::Conflict(format!("Guest {} still has check-ins", id));
                }
                error!("Database error deleting guest {}: {}", id, e);
                AppError::Database(format!("Failed to delete guest: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl GuestRepository for PgGuestRepository {
    #[instrument(skip(self))]
    async fn find_by_data(&self, data: &str) -> AppResult<Vec<Guest>> {
        debug!("Finding guests by name/document/telephone");

        let rows = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            SELECT id, name, document, telephone, created_at, updated_at
            FROM guests
            WHERE name = $1
               OR document = $1
               OR telephone = $1
            ORDER BY id
            "#,
        )
        .bind(data)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error searching guests: {}", e);
            AppError::Database(format!("Failed to search guests: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_past(&self, now: DateTime<Utc>) -> AppResult<Vec<Guest>> {
        let rows = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            SELECT DISTINCT g.id, g.name, g.document, g.telephone, g.created_at, g.updated_at
            FROM check_ins c
            JOIN guests g ON g.id = c.guest_id
            WHERE c.departure_date < $1
            ORDER BY g.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding past guests: {}", e);
            AppError::Database(format!("Failed to fetch past guests: {}", e))
        })?;

        debug!("Found {} past guests", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_current(&self, now: DateTime<Utc>) -> AppResult<Vec<Guest>> {
        let rows = sqlx::query_as::<sqlx::Postgres, GuestRow>(
            r#"
            SELECT DISTINCT g.id, g.name, g.document, g.telephone, g.created_at, g.updated_at
            FROM check_ins c
            JOIN guests g ON g.id = c.guest_id
            WHERE c.entry_date < $1
              AND c.departure_date > $1
            ORDER BY g.id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding current guests: {}", e);
            AppError::Database(format!("Failed to fetch current guests: {}", e))
        })?;

        debug!("Found {} guests in house", rows.len());
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct GuestRow {
    id: i64,
    name: String,
    document: Option<String>,
    telephone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GuestRow> for Guest {
    fn from(row: GuestRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            document: row.document,
            telephone: row.telephone,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
