//! Guest handlers
//!
//! HTTP handlers for guest registration, lookup and per-guest amounts.

use crate::dto::guest::{AmountResponse, GuestCreateRequest, GuestResponse, GuestUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use crate::handlers::check_in::check_in_service;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures::future::try_join;
use guesthouse_core::traits::{CheckInRepository, GuestRepository, Repository};
use guesthouse_core::AppError;
use guesthouse_db::{PgCheckInRepository, PgGuestRepository};
use guesthouse_services::StayCostCalculator;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

fn into_responses(guests: Vec<guesthouse_core::models::Guest>) -> Vec<GuestResponse> {
    guests.into_iter().map(GuestResponse::from).collect()
}

/// List guests with pagination
///
/// GET /api/v1/guests
#[instrument(skip(pool))]
pub async fn list_guests(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = query.page, per_page = query.per_page, "Listing guests");

    let repo = PgGuestRepository::new(pool.get_ref().clone());
    let (guests, total) =
        try_join(repo.find_all(query.limit(), query.offset()), repo.count()).await?;

    Ok(HttpResponse::Ok().json(query.paginate(into_responses(guests), total)))
}

/// Register a new guest
///
/// POST /api/v1/guests
#[instrument(skip(pool, req))]
pub async fn create_guest(
    pool: web::Data<PgPool>,
    req: web::Json<GuestCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Guest creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgGuestRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_guest()).await?;

    info!(id = created.id, "Guest created successfully");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        GuestResponse::from(created),
        "Guest created successfully",
    )))
}

/// Find guests by exact name, document or telephone
///
/// GET /api/v1/guests/search/{data}
#[instrument(skip(pool))]
pub async fn search_guests(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let data = path.into_inner();
    let repo = PgGuestRepository::new(pool.get_ref().clone());
    let guests = repo.find_by_data(&data).await?;

    debug!(found = guests.len(), "Guest search finished");
    Ok(HttpResponse::Ok().json(ApiResponse::success(into_responses(guests))))
}

/// Guests currently in the hotel
///
/// GET /api/v1/guests/current
#[instrument(skip(pool))]
pub async fn current_guests(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let repo = PgGuestRepository::new(pool.get_ref().clone());
    let guests = repo.find_current(Utc::now()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(into_responses(guests))))
}

/// Guests who already left
///
/// GET /api/v1/guests/past
#[instrument(skip(pool))]
pub async fn past_guests(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let repo = PgGuestRepository::new(pool.get_ref().clone());
    let guests = repo.find_past(Utc::now()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(into_responses(guests))))
}

/// Get a single guest by ID
///
/// GET /api/v1/guests/{id}
#[instrument(skip(pool))]
pub async fn get_guest(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let guest_id = path.into_inner();
    let repo = PgGuestRepository::new(pool.get_ref().clone());

    let guest = repo
        .find_by_id(guest_id)
        .await?
        .ok_or_else(|| AppError::GuestNotFound(guest_id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(GuestResponse::from(guest))))
}

/// Update a guest
///
/// PUT /api/v1/guests/{id}
#[instrument(skip(pool, req))]
pub async fn update_guest(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    req: web::Json<GuestUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Guest update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let guest_id = path.into_inner();
    let repo = PgGuestRepository::new(pool.get_ref().clone());

    let mut guest = repo
        .find_by_id(guest_id)
        .await?
        .ok_or_else(|| AppError::GuestNotFound(guest_id.to_string()))?;

    req.apply(&mut guest);
    let updated = repo.update(&guest).await?;

    info!(id = updated.id, "Guest updated successfully");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        GuestResponse::from(updated),
        "Guest updated successfully",
    )))
}

/// Delete a guest without check-ins
///
/// DELETE /api/v1/guests/{id}
#[instrument(skip(pool))]
pub async fn delete_guest(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let guest_id = path.into_inner();

    let check_ins = PgCheckInRepository::new(pool.get_ref().clone())
        .count_by_guest(guest_id)
        .await?;
    if check_ins > 0 {
        warn!(id = guest_id, check_ins, "Refusing to delete guest with check-ins");
        return Err(AppError::Conflict(format!(
            "Guest {} has {} check-ins",
            guest_id, check_ins
        )));
    }

    let repo = PgGuestRepository::new(pool.get_ref().clone());
    if !repo.delete(guest_id).await? {
        return Err(AppError::GuestNotFound(guest_id.to_string()));
    }

    info!(id = guest_id, "Guest deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Cost of the guest's most recent check-in
///
/// GET /api/v1/guests/{id}/last-booking-amount
#[instrument(skip(pool, calculator))]
pub async fn last_booking_amount(
    pool: web::Data<PgPool>,
    calculator: web::Data<StayCostCalculator>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let guest_id = path.into_inner();
    let amount = check_in_service(&pool, &calculator)
        .last_booking_amount(guest_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AmountResponse { guest_id, amount })))
}

/// Sum of all the guest's check-in costs
///
/// GET /api/v1/guests/{id}/total-amount
#[instrument(skip(pool, calculator))]
pub async fn total_amount(
    pool: web::Data<PgPool>,
    calculator: web::Data<StayCostCalculator>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let guest_id = path.into_inner();
    let amount = check_in_service(&pool, &calculator)
        .total_amount(guest_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(AmountResponse {
        guest_id,
        amount: Some(amount),
    })))
}

/// Configure guest routes
///
/// Fixed segments are registered before `/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/guests")
            .route("", web::get().to(list_guests))
            .route("", web::post().to(create_guest))
            .route("/search/{data}", web::get().to(search_guests))
            .route("/current", web::get().to(current_guests))
            .route("/past", web::get().to(past_guests))
            .route("/{id}", web::get().to(get_guest))
            .route("/{id}", web::put().to(update_guest))
            .route("/{id}", web::delete().to(delete_guest))
            .route("/{id}/last-booking-amount", web::get().to(last_booking_amount))
            .route("/{id}/total-amount", web::get().to(total_amount)),
    );
}
