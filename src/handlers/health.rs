// handlers/health.rs - GET /health handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::{AppState, Backend};

pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let backend = match &state.backend {
        Backend::Postgres(pool) => {
            DatabaseManager::health_check(pool).await.map_err(|e| {
                tracing::error!("Health check failed: {}", e);
                ApiError::service_unavailable("Database temporarily unavailable")
            })?;
            "postgres"
        }
        Backend::Memory => "memory",
    };

    Ok(ApiResponse::success(json!({
        "status": "ok",
        "backend": backend,
        "environment": state.config.environment,
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
