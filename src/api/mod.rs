pub mod health;
pub mod root;
pub mod signup;
pub mod swagger;
pub mod users;

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{web, HttpResponse, ResponseError};
use serde_json::json;

use crate::utils::error::{AppError, ValidationError};

/// Largest accepted JSON body, in bytes
pub const BODY_LIMIT: usize = 16 * 1024;

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(BODY_LIMIT)
        .error_handler(|err, _req| {
            log::warn!("❌ Rejected request body: {}", err);
            let response = body_error_response(&err);
            InternalError::from_response(err, response).into()
        })
}

/// Oversized bodies are 413. Anything else wrong with the body gets the
/// same 422 shape as field validation failures.
fn body_error_response(err: &JsonPayloadError) -> HttpResponse {
    match err {
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            HttpResponse::PayloadTooLarge().json(json!({
                "success": false,
                "error": "Request body too large"
            }))
        }
        _ => AppError::Validation(ValidationError::body(err.to_string())).error_response(),
    }
}

/// Registers every route on an actix `ServiceConfig`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/", web::get().to(root::index))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/signup")
                .route("/admin", web::post().to(signup::admin_signup))
                .route("/student", web::post().to(signup::student_signup))
                .route("/school_college", web::post().to(signup::school_college_signup))
                .route("/promoter", web::post().to(signup::promoter_signup)),
        )
        .service(
            web::scope("/users")
                .route("/count", web::get().to(users::get_users_count))
                .route("/all", web::get().to(users::get_all_users)),
        );
}
