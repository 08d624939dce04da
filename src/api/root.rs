use actix_web::{HttpResponse, Responder};
use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct EndpointIndex {
    pub admin_signup: String,
    pub student_signup: String,
    pub school_college_signup: String,
    pub promoter_signup: String,
    pub users_count: String,
    pub all_users: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointIndex,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service metadata and endpoint index", body = IndexResponse)
    )
)]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(IndexResponse {
        message: "Welcome to User Registration API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointIndex {
            admin_signup: "/signup/admin".to_string(),
            student_signup: "/signup/student".to_string(),
            school_college_signup: "/signup/school_college".to_string(),
            promoter_signup: "/signup/promoter".to_string(),
            users_count: "/users/count".to_string(),
            all_users: "/users/all".to_string(),
        },
    })
}
