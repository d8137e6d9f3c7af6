use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::format::page_to_api_value;
use crate::grams::controller::{Outcome, Page};
use crate::types::View;

/// Wrapper for API responses that automatically adds success envelope.
/// Rendered pages also name the view they belong to.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub view: Option<View>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(data: T) -> Self {
        Self {
            view: None,
            data,
        }
    }

    /// Create a 200 response for a rendered view
    pub fn render(view: View, data: T) -> Self {
        Self {
            view: Some(view),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = match self.view {
            Some(view) => json!({ "success": true, "view": view, "data": data_value }),
            None => json!({ "success": true, "data": data_value }),
        };

        (StatusCode::OK, Json(envelope)).into_response()
    }
}

/// 302 Found with a Location header
pub fn redirect(location: &str) -> Response {
    match header::HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!("Refusing to redirect to invalid location {:?}", location);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

impl From<Page> for ApiResponse<Value> {
    fn from(page: Page) -> Self {
        ApiResponse::render(page.view(), page_to_api_value(&page))
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Outcome::Render(page) => ApiResponse::from(page).into_response(),
            Outcome::Redirect { location } => redirect(location),
        }
    }
}

// Convenience type aliases
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
