// handlers/sessions.rs - GET /users/sign_in handler
//
// The login entry point unauthenticated requests are redirected to.
// Tokens are issued out of band with `gram user token <email>`.

use axum::extract::State;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, Principal};
use crate::state::AppState;
use crate::types::View;

pub async fn sign_in(State(state): State<AppState>, principal: Principal) -> ApiResponse<Value> {
    ApiResponse::render(
        View::SignIn,
        json!({
            "signed_in": principal.user_id().is_some(),
            "scheme": "Bearer",
            "header": "Authorization",
            "token_command": "gram user token <email>",
            "expires_in_hours": state.keys.expiry_hours(),
        }),
    )
}
