// handlers/params.rs - gram payload extraction for POST /grams and PATCH/PUT /grams/:id
//
// Extraction never rejects the request. Decoding problems are carried in
// `GramParams::payload_errors` so the controller can still apply its
// authentication and ownership checks before reporting them as a 422.

use std::convert::Infallible;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use serde_json::Value;

use crate::grams::validation::GramParams;
use crate::pictures::PictureUpload;

const MESSAGE_FIELDS: &[&str] = &["gram[message]", "message"];
const PICTURE_FIELDS: &[&str] = &["gram[picture]", "picture"];

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for GramParams {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase())
            .unwrap_or_default();

        let params = if content_type.starts_with("multipart/form-data") {
            match Multipart::from_request(req, state).await {
                Ok(multipart) => from_multipart(multipart).await,
                Err(e) => rejected(e.body_text()),
            }
        } else {
            match Bytes::from_request(req, state).await {
                Ok(body) if content_type.starts_with("application/json") => from_json(&body),
                Ok(body) if content_type.starts_with("application/x-www-form-urlencoded") => {
                    from_urlencoded(&body)
                }
                Ok(body) if body.is_empty() => GramParams::default(),
                Ok(_) => rejected(format!("unsupported content type '{}'", content_type)),
                Err(e) => rejected(e.body_text()),
            }
        };

        if !params.payload_errors.is_empty() {
            tracing::debug!("Gram payload problems: {:?}", params.payload_errors);
        }
        Ok(params)
    }
}

fn rejected(problem: impl Into<String>) -> GramParams {
    GramParams {
        payload_errors: vec![problem.into()],
        ..Default::default()
    }
}

async fn from_multipart(mut multipart: Multipart) -> GramParams {
    let mut params = GramParams::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                params.payload_errors.push(e.body_text());
                break;
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        if MESSAGE_FIELDS.contains(&name.as_str()) {
            match field.text().await {
                Ok(text) => params.message = Some(text),
                Err(e) => params.payload_errors.push(e.body_text()),
            }
        } else if PICTURE_FIELDS.contains(&name.as_str()) {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            match field.bytes().await {
                // An untouched file input submits an empty part without a name
                Ok(bytes) if bytes.is_empty() && filename.is_empty() => {}
                Ok(bytes) => {
                    params.picture = Some(PictureUpload::new(filename, content_type, bytes.to_vec()))
                }
                Err(e) => params.payload_errors.push(e.body_text()),
            }
        }
    }

    params
}

fn from_urlencoded(body: &[u8]) -> GramParams {
    let mut params = GramParams::default();
    for (name, value) in url::form_urlencoded::parse(body) {
        if MESSAGE_FIELDS.contains(&name.as_ref()) {
            params.message = Some(value.into_owned());
        } else if PICTURE_FIELDS.contains(&name.as_ref()) && !value.is_empty() {
            params
                .payload_errors
                .push("picture must be uploaded as multipart/form-data".to_string());
        }
    }
    params
}

/// Accepts `{"gram": {"message": ...}}` or a bare `{"message": ...}`
fn from_json(body: &[u8]) -> GramParams {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => return rejected(format!("invalid JSON body: {}", e)),
    };

    let attrs = match value.get("gram") {
        Some(inner) => inner,
        None => &value,
    };
    let Some(attrs) = attrs.as_object() else {
        return rejected("JSON body must be an object");
    };

    let mut params = GramParams::default();
    match attrs.get("message") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) => params.message = Some(message.clone()),
        Some(_) => params.payload_errors.push("message must be a string".to_string()),
    }
    if attrs.get("picture").is_some_and(|p| !p.is_null()) {
        params
            .payload_errors
            .push("picture must be uploaded as multipart/form-data".to_string());
    }
    params
}
