use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Field that a uniqueness rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Phone,
}

impl UniqueField {
    pub fn conflict_message(&self) -> &'static str {
        match self {
            UniqueField::Email => "Email already registered!",
            UniqueField::Phone => "Phone number already registered!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn body(reason: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new("body", reason)])
    }

    /// Validator reported no field errors but a required value is missing
    pub(crate) fn incomplete() -> Self {
        Self::body("Incomplete payload")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.reason))
            .collect();
        write!(f, "{}", fields.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised by the registry store adapter
#[derive(Debug)]
pub enum StoreError {
    /// Connection unavailable or operation rejected
    Unavailable(String),
    /// Insert hit a unique index
    Duplicate(UniqueField),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store error: {}", msg),
            StoreError::Duplicate(field) => write!(f, "Duplicate key: {:?}", field),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationError),
    Forbidden(String),
    Conflict(UniqueField),
    /// Carries the internal detail for logging; clients get the public message only
    Store { public: &'static str, detail: String },
}

impl AppError {
    pub fn store(public: &'static str, err: impl fmt::Display) -> Self {
        AppError::Store {
            public,
            detail: err.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(err) => write!(f, "Validation failed: {}", err),
            AppError::Forbidden(msg) => write!(f, "{}", msg),
            AppError::Conflict(field) => write!(f, "{}", field.conflict_message()),
            AppError::Store { public, detail } => write!(f, "{}: {}", public, detail),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(err) => serde_json::json!({
                "success": false,
                "error": "Validation failed",
                "details": err.errors,
            }),
            AppError::Forbidden(msg) => serde_json::json!({
                "success": false,
                "error": msg,
            }),
            AppError::Conflict(field) => serde_json::json!({
                "success": false,
                "error": field.conflict_message(),
            }),
            AppError::Store { public, .. } => serde_json::json!({
                "success": false,
                "error": public,
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
