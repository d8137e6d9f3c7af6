//! Router assembly.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::authenticate;
use crate::state::AppState;

/// Room for the message field and multipart framing around the picture
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub fn app(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_picture_bytes.saturating_add(BODY_LIMIT_SLACK);

    let mut router = Router::new()
        .route("/health", get(handlers::health::health))
        .merge(gram_routes())
        .merge(session_routes())
        .merge(picture_routes())
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(DefaultBodyLimit::max(body_limit));

    if let Some(cors) = cors_layer(&state.config.security) {
        router = router.layer(cors);
    }
    if state.config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn gram_routes() -> Router<AppState> {
    use handlers::grams;

    Router::new()
        .route("/", get(grams::index))
        .route("/grams", get(grams::index).post(grams::create))
        .route("/grams/new", get(grams::new))
        .route(
            "/grams/:id",
            get(grams::show)
                .patch(grams::update)
                .put(grams::update)
                .delete(grams::destroy),
        )
        .route("/grams/:id/edit", get(grams::edit))
}

fn session_routes() -> Router<AppState> {
    Router::new().route("/users/sign_in", get(handlers::sessions::sign_in))
}

fn picture_routes() -> Router<AppState> {
    Router::new().route("/pictures/:key", get(handlers::pictures::picture))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    )
}
