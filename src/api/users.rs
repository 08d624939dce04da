use actix_web::{web, HttpResponse};

use crate::models::{UserCounts, UserListResponse};
use crate::services::RegistrationService;
use crate::utils::error::AppError;

#[utoipa::path(
    get,
    path = "/users/count",
    tag = "Users",
    responses(
        (status = 200, description = "User count per type", body = UserCounts),
        (status = 500, description = "Failed to fetch user count")
    )
)]
pub async fn get_users_count(
    service: web::Data<RegistrationService>,
) -> Result<HttpResponse, AppError> {
    log::info!("📊 GET /users/count");

    let counts = service.count_by_type().await.map_err(|e| {
        log::error!("❌ {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(counts))
}

#[utoipa::path(
    get,
    path = "/users/all",
    tag = "Users",
    responses(
        (status = 200, description = "Every registered user, without credentials", body = UserListResponse),
        (status = 500, description = "Failed to fetch users")
    )
)]
pub async fn get_all_users(
    service: web::Data<RegistrationService>,
) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /users/all");

    let users = service.list_all().await.map_err(|e| {
        log::error!("❌ {}", e);
        e
    })?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        total_users: users.len(),
        users,
    }))
}
