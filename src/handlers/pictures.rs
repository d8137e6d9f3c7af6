// handlers/pictures.rs - GET /pictures/:key handler
//
// Serves stored attachments. Picture URLs are public like the listing
// that links to them.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::pictures::validate_key;
use crate::state::AppState;

pub async fn picture(State(state): State<AppState>, Path(key): Path<String>) -> Result<Response, ApiError> {
    validate_key(&key)?;

    let stored = state
        .pictures
        .get(&key)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Picture '{}' not found", key)))?;

    Ok((
        [
            (header::CONTENT_TYPE, stored.content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        stored.bytes,
    )
        .into_response())
}
