// HTTP API Error Types
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};

use crate::grams::error::GramError;
use crate::grams::store::StoreError;
use crate::grams::validation::{FieldErrors, GramForm};
use crate::pictures::PictureError;
use crate::types::{paths, View};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 302 Found - sent to the login entry point instead of a 4xx body
    Unauthenticated { location: &'static str },

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 422 Unprocessable Entity - the form is re-rendered with submitted values
    UnprocessableEntity {
        message: String,
        view: View,
        field_errors: FieldErrors,
        form: GramForm,
    },

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated { .. } => StatusCode::FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthenticated { .. } => "You need to sign in before continuing",
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::UnprocessableEntity { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated { .. } => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::UnprocessableEntity { message, view, field_errors, form } => {
                json!({
                    "success": false,
                    "view": view,
                    "error": message,
                    "code": self.error_code(),
                    "field_errors": field_errors,
                    "full_messages": field_errors.full_messages(),
                    "form": form,
                })
            }
            _ => {
                json!({
                    "success": false,
                    "error": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated { location: paths::SIGN_IN }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<GramError> for ApiError {
    fn from(err: GramError) -> Self {
        match err {
            GramError::Unauthenticated => ApiError::unauthenticated(),
            GramError::NotFound(id) => ApiError::not_found(format!("Gram '{}' not found", id)),
            GramError::Forbidden { .. } => ApiError::forbidden("You are not allowed to modify this gram"),
            GramError::Invalid { view, errors, form } => ApiError::UnprocessableEntity {
                message: format!("Gram could not be saved: {}", errors),
                view,
                field_errors: errors,
                form,
            },
            GramError::Store(e) => e.into(),
            GramError::Picture(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // Don't expose store details to clients
            StoreError::Unavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            StoreError::Query(msg) => {
                tracing::error!("Store query error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            StoreError::Conflict(msg) => ApiError::conflict(msg),
        }
    }
}

impl From<PictureError> for ApiError {
    fn from(err: PictureError) -> Self {
        match err {
            PictureError::InvalidKey(key) => ApiError::not_found(format!("Picture '{}' not found", key)),
            PictureError::Io(e) => {
                tracing::error!("Picture storage error: {}", e);
                ApiError::internal_server_error("Picture storage failed")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Unauthenticated { location } => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
            other => (other.status_code(), Json(other.to_json())).into_response(),
        }
    }
}
