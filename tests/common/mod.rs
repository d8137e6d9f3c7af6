#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use gram_api::config::AppConfig;
use gram_api::grams::{Gram, MemoryGramStore};
use gram_api::pictures::MemoryPictureStore;
use gram_api::state::{AppState, Backend};
use gram_api::users::{MemoryUserStore, User, UserStore};

const BOUNDARY: &str = "gram-test-boundary";

/// The application wired to in-memory stores, with handles kept for assertions
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub grams: Arc<MemoryGramStore>,
    pub users: Arc<MemoryUserStore>,
    pub pictures: Arc<MemoryPictureStore>,
}

impl TestApp {
    pub fn spawn() -> Result<Self> {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Result<Self> {
        let grams = Arc::new(MemoryGramStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let pictures = Arc::new(MemoryPictureStore::new());

        let state = AppState::assemble(config, grams.clone(), users.clone(), pictures.clone(), Backend::Memory)
            .context("failed to assemble state")?;
        let router = gram_api::app(state.clone());

        Ok(Self { router, state, grams, users, pictures })
    }

    /// Register a user and return it with a bearer token
    pub async fn sign_up(&self, email: &str) -> Result<(User, String)> {
        let user = self.users.create(email).await?;
        let token = self.state.keys.issue(&user)?;
        Ok((user, token))
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    /// Create a gram through the API and return the stored record
    pub async fn create_gram(&self, token: &str, message: &str) -> Result<Gram> {
        let response = self
            .send(multipart(Method::POST, "/grams", Some(token), Some(message), Some(png_part())))
            .await?;
        anyhow::ensure!(
            response.status() == StatusCode::FOUND,
            "create returned {}",
            response.status()
        );
        self.grams.last().await.context("no gram stored")
    }
}

pub struct PicturePart {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn png_part() -> PicturePart {
    PicturePart {
        filename: "picture.png",
        content_type: "image/png",
        bytes: vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a],
    }
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    builder(Method::GET, uri, token).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    builder(Method::DELETE, uri, token).body(Body::empty()).unwrap()
}

pub fn json(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    builder(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    builder(method, uri, token)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// multipart/form-data body with `gram[message]` and `gram[picture]` parts
pub fn multipart(
    method: Method,
    uri: &str,
    token: Option<&str>,
    message: Option<&str>,
    picture: Option<PicturePart>,
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();
    if let Some(message) = message {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"gram[message]\"\r\n\r\n{}\r\n",
                BOUNDARY, message
            )
            .as_bytes(),
        );
    }
    if let Some(picture) = picture {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"gram[picture]\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, picture.filename, picture.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&picture.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    builder(method, uri, token)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_json(response: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    serde_json::from_slice(&bytes).context("response body is not JSON")
}

pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

/// Assert a 302 to the given location
pub fn assert_redirect(response: &Response, expected: &str) {
    assert_eq!(response.status(), StatusCode::FOUND, "expected redirect to {}", expected);
    assert_eq!(location(response), Some(expected));
}
