use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::grams::model::UserId;
use crate::state::AppState;

/// The principal resolved for a request; `None` means anonymous
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Principal(pub Option<UserId>);

impl Principal {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.0
    }
}

/// Resolves the bearer token into a [`Principal`] and stores it in request extensions.
/// Missing or bad credentials never fail the request; actions decide whether they need a user.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = resolve_principal(&state, request.headers()).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = match extract_jwt_from_headers(headers) {
        Ok(Some(token)) => token,
        Ok(None) => return Ok(Principal::anonymous()),
        Err(msg) => {
            tracing::debug!("Ignoring credentials: {}", msg);
            return Ok(Principal::anonymous());
        }
    };

    let claims = match state.keys.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!("Rejected bearer token: {}", e);
            return Ok(Principal::anonymous());
        }
    };

    // Tokens outlive users; the subject must still exist
    match state.users.find(claims.user_id()).await? {
        Some(user) => {
            tracing::debug!("Authenticated {} ({})", user.email, user.id);
            Ok(Principal(Some(user.id)))
        }
        None => {
            tracing::warn!("Token subject {} no longer exists", claims.sub);
            Ok(Principal::anonymous())
        }
    }
}

/// Extract JWT token from Authorization header; `Ok(None)` when no header is present
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<Option<String>, String> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err("Empty JWT token".to_string()),
        None => Err("Authorization header must use Bearer token format".to_string()),
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().copied().unwrap_or_default())
    }
}
