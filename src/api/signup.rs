use actix_web::{web, HttpResponse};

use crate::models::{AdminSignup, PromoterSignup, SchoolCollegeSignup, StudentSignup, UserResponse};
use crate::services::{RegistrationService, SignupRequest};
use crate::utils::error::AppError;

async fn signup(
    service: &RegistrationService,
    request: SignupRequest,
) -> Result<HttpResponse, AppError> {
    let kind = request.kind();
    log::info!("📝 POST /signup/{}", kind);

    match service.register(request).await {
        Ok(response) => {
            log::info!("✅ Registered {} {} ({})", kind, response.email, response.id);
            Ok(HttpResponse::Created().json(response))
        }
        Err(e) => {
            match &e {
                AppError::Store { .. } => log::error!("❌ {} signup failed: {}", kind, e),
                _ => log::warn!("❌ {} signup rejected: {}", kind, e),
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    post,
    path = "/signup/admin",
    tag = "Signup",
    request_body = AdminSignup,
    responses(
        (status = 201, description = "Admin registered", body = UserResponse),
        (status = 400, description = "Email or phone already registered"),
        (status = 403, description = "Invalid admin code"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn admin_signup(
    service: web::Data<RegistrationService>,
    request: web::Json<AdminSignup>,
) -> Result<HttpResponse, AppError> {
    signup(&service, SignupRequest::Admin(request.into_inner())).await
}

#[utoipa::path(
    post,
    path = "/signup/student",
    tag = "Signup",
    request_body = StudentSignup,
    responses(
        (status = 201, description = "Student registered", body = UserResponse),
        (status = 400, description = "Email or phone already registered"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn student_signup(
    service: web::Data<RegistrationService>,
    request: web::Json<StudentSignup>,
) -> Result<HttpResponse, AppError> {
    signup(&service, SignupRequest::Student(request.into_inner())).await
}

#[utoipa::path(
    post,
    path = "/signup/school_college",
    tag = "Signup",
    request_body = SchoolCollegeSignup,
    responses(
        (status = 201, description = "School/College registered", body = UserResponse),
        (status = 400, description = "Email or phone already registered"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn school_college_signup(
    service: web::Data<RegistrationService>,
    request: web::Json<SchoolCollegeSignup>,
) -> Result<HttpResponse, AppError> {
    signup(&service, SignupRequest::SchoolCollege(request.into_inner())).await
}

#[utoipa::path(
    post,
    path = "/signup/promoter",
    tag = "Signup",
    request_body = PromoterSignup,
    responses(
        (status = 201, description = "Promoter registered", body = UserResponse),
        (status = 400, description = "Email or phone already registered"),
        (status = 422, description = "Validation failed"),
        (status = 500, description = "Registration failed")
    )
)]
pub async fn promoter_signup(
    service: web::Data<RegistrationService>,
    request: web::Json<PromoterSignup>,
) -> Result<HttpResponse, AppError> {
    signup(&service, SignupRequest::Promoter(request.into_inner())).await
}
