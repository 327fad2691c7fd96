//! API layer for the guesthouse backend
//!
//! HTTP handlers for guests, check-ins and stay quotes.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

use actix_web::{error::InternalError, web, HttpResponse};

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

pub use handlers::{configure_check_ins, configure_guests, health_check};

/// Configure API routes under `/api/v1`
///
/// Handlers expect `web::Data<PgPool>` and `web::Data<StayCostCalculator>`
/// in app data.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(configure_guests)
            .configure(configure_check_ins),
    );
}

/// Query extractor config rendering parse failures like `AppError` bodies
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let error_message = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "invalid_query",
                "message": error_message,
                "status": 400,
            })),
        )
        .into()
    })
}

/// JSON body extractor config rendering parse failures like `AppError` bodies
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req| {
            let error_message = err.to_string();
            InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "invalid_body",
                    "message": error_message,
                    "status": 400,
                })),
            )
            .into()
        })
}
