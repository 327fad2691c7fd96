//! Check-in handlers
//!
//! HTTP handlers for check-in CRUD and stay quotes. Every write goes through
//! `CheckInService` so the stored cost always matches the stored stay.

use crate::dto::check_in::{
    CheckInCreateRequest, CheckInResponse, CheckInUpdateRequest, StayQuoteRequest,
    StayQuoteResponse,
};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use futures::future::try_join;
use guesthouse_core::models::{CheckIn, Stay};
use guesthouse_core::traits::{CheckInRepository, Repository};
use guesthouse_core::AppError;
use guesthouse_db::{PgCheckInRepository, PgGuestRepository};
use guesthouse_services::{CheckInService, StayCostCalculator};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Check-in service backed by PostgreSQL repositories
pub(crate) fn check_in_service(
    pool: &web::Data<PgPool>,
    calculator: &web::Data<StayCostCalculator>,
) -> CheckInService<PgCheckInRepository, PgGuestRepository> {
    CheckInService::new(
        Arc::new(PgCheckInRepository::new(pool.get_ref().clone())),
        Arc::new(PgGuestRepository::new(pool.get_ref().clone())),
        calculator.clone().into_inner(),
    )
}

fn into_responses(check_ins: Vec<CheckIn>) -> Vec<CheckInResponse> {
    check_ins.into_iter().map(CheckInResponse::from).collect()
}

/// List check-ins with pagination
///
/// GET /api/v1/checkins
#[instrument(skip(pool))]
pub async fn list_check_ins(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = query.page, per_page = query.per_page, "Listing check-ins");

    let repo = PgCheckInRepository::new(pool.get_ref().clone());
    let (check_ins, total) =
        try_join(repo.find_all(query.limit(), query.offset()), repo.count()).await?;

    Ok(HttpResponse::Ok().json(query.paginate(into_responses(check_ins), total)))
}

/// Register a check-in with its computed cost
///
/// POST /api/v1/checkins
#[instrument(skip(pool, calculator, req))]
pub async fn create_check_in(
    pool: web::Data<PgPool>,
    calculator: web::Data<StayCostCalculator>,
    req: web::Json<CheckInCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Check-in validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let created = check_in_service(&pool, &calculator)
        .register(req.to_new_check_in())
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        CheckInResponse::from(created),
        "Check-in created successfully",
    )))
}

/// Price a stay without storing it
///
/// POST /api/v1/checkins/quote
#[instrument(skip(calculator, req))]
pub async fn quote_stay(
    calculator: web::Data<StayCostCalculator>,
    req: web::Json<StayQuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let stay = Stay::from(req.into_inner());
    let quote = calculator.quote(&stay)?;

    debug!(total = %quote.total, "Stay quoted");
    Ok(HttpResponse::Ok().json(ApiResponse::success(StayQuoteResponse::from(quote))))
}

/// Find check-ins by guest name, document or telephone
///
/// GET /api/v1/checkins/search/{data}
#[instrument(skip(pool))]
pub async fn search_check_ins(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let data = path.into_inner();
    let repo = PgCheckInRepository::new(pool.get_ref().clone());
    let check_ins = repo.find_by_guest_data(&data).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(into_responses(check_ins))))
}

/// Get a single check-in by ID
///
/// GET /api/v1/checkins/{id}
#[instrument(skip(pool))]
pub async fn get_check_in(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let check_in_id = path.into_inner();
    let repo = PgCheckInRepository::new(pool.get_ref().clone());

    let check_in = repo
        .find_by_id(check_in_id)
        .await?
        .ok_or_else(|| AppError::CheckInNotFound(check_in_id.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(CheckInResponse::from(check_in))))
}

/// Update a check-in and recompute its cost
///
/// PUT /api/v1/checkins/{id}
#[instrument(skip(pool, calculator, req))]
pub async fn update_check_in(
    pool: web::Data<PgPool>,
    calculator: web::Data<StayCostCalculator>,
    path: web::Path<i64>,
    req: web::Json<CheckInUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Check-in update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let check_in_id = path.into_inner();
    let updated = check_in_service(&pool, &calculator)
        .reprice(check_in_id, req.into_inner().into())
        .await?;

    info!(id = updated.id, total_cost = %updated.total_cost, "Check-in updated");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        CheckInResponse::from(updated),
        "Check-in updated successfully",
    )))
}

/// Delete a check-in
///
/// DELETE /api/v1/checkins/{id}
#[instrument(skip(pool))]
pub async fn delete_check_in(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let check_in_id = path.into_inner();
    let repo = PgCheckInRepository::new(pool.get_ref().clone());

    if !repo.delete(check_in_id).await? {
        return Err(AppError::CheckInNotFound(check_in_id.to_string()));
    }

    info!(id = check_in_id, "Check-in deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure check-in routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/checkins")
            .route("", web::get().to(list_check_ins))
            .route("", web::post().to(create_check_in))
            .route("/quote", web::post().to(quote_stay))
            .route("/search/{data}", web::get().to(search_check_ins))
            .route("/{id}", web::get().to(get_check_in))
            .route("/{id}", web::put().to(update_check_in))
            .route("/{id}", web::delete().to(delete_check_in)),
    );
}
