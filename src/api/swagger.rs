use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registration API",
        version = "1.0.0",
        description = "Registration system for Admin, Student, School/College and Promoter accounts.\n\n**Features:**\n- Role-specific signup with field validation\n- Email and phone uniqueness across all roles\n- User counts per role and full user listing (no credentials)"
    ),
    paths(
        crate::api::root::index,
        crate::api::health::health_check,
        crate::api::signup::admin_signup,
        crate::api::signup::student_signup,
        crate::api::signup::school_college_signup,
        crate::api::signup::promoter_signup,
        crate::api::users::get_users_count,
        crate::api::users::get_all_users,
    ),
    components(
        schemas(
            crate::models::AdminSignup,
            crate::models::StudentSignup,
            crate::models::SchoolCollegeSignup,
            crate::models::PromoterSignup,
            crate::models::UserResponse,
            crate::models::UserRecord,
            crate::models::UserCounts,
            crate::models::UserListResponse,
            crate::models::RoleKind,
            crate::utils::error::FieldError,
            crate::api::health::HealthResponse,
            crate::api::root::IndexResponse,
            crate::api::root::EndpointIndex,
        )
    ),
    tags(
        (name = "Signup", description = "Role-specific registration endpoints."),
        (name = "Users", description = "Read-only user counts and listing."),
        (name = "Health", description = "Service metadata and health check."),
    )
)]
pub struct ApiDoc;
