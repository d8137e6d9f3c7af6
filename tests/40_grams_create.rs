mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn new_form_requires_sign_in() -> Result<()> {
    let app = common::TestApp::spawn()?;

    let res = app.send(common::get("/grams/new", None)).await?;
    common::assert_redirect(&res, "/users/sign_in");
    Ok(())
}

#[tokio::test]
async fn new_form_renders_empty_gram() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;

    let res = app.send(common::get("/grams/new", Some(&token))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await?;
    assert_eq!(body["view"], "grams/new");
    assert!(body["data"]["form"]["message"].is_null());
    Ok(())
}

#[tokio::test]
async fn create_persists_gram_owned_by_current_user() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (ada, token) = app.sign_up("ada@example.com").await?;

    let res = app
        .send(common::multipart(
            Method::POST,
            "/grams",
            Some(&token),
            Some("Hello!"),
            Some(common::png_part()),
        ))
        .await?;
    common::assert_redirect(&res, "/");

    let gram = app.grams.last().await.expect("gram stored");
    assert_eq!(gram.message, "Hello!");
    assert_eq!(gram.owner, ada.id);
    assert_eq!(gram.picture.content_type, "image/png");
    assert!(app.pictures.contains(&gram.picture.key).await);
    Ok(())
}

#[tokio::test]
async fn stored_picture_is_served() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;
    let gram = app.create_gram(&token, "Hello!").await?;

    let res = app.send(common::get(&gram.picture.url(), None)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    assert_eq!(bytes.as_ref(), common::png_part().bytes.as_slice());

    let res = app.send(common::get("/pictures/missing.png", None)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn anonymous_create_redirects_and_stores_nothing() -> Result<()> {
    let app = common::TestApp::spawn()?;

    let res = app
        .send(common::multipart(Method::POST, "/grams", None, Some("Hello!"), Some(common::png_part())))
        .await?;
    common::assert_redirect(&res, "/users/sign_in");
    assert!(app.grams.last().await.is_none());
    assert_eq!(app.pictures.len().await, 0);
    Ok(())
}

#[tokio::test]
async fn blank_message_is_unprocessable() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;

    for message in ["", "   "] {
        let res = app
            .send(common::multipart(
                Method::POST,
                "/grams",
                Some(&token),
                Some(message),
                Some(common::png_part()),
            ))
            .await?;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = common::body_json(res).await?;
        assert_eq!(body["view"], "grams/new");
        assert_eq!(body["field_errors"]["message"][0], "can't be blank");
        assert_eq!(body["form"]["message"], message);
    }

    assert!(app.grams.last().await.is_none());
    assert_eq!(app.pictures.len().await, 0);
    Ok(())
}

#[tokio::test]
async fn missing_picture_is_unprocessable() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;

    let res = app
        .send(common::json(Method::POST, "/grams", Some(&token), json!({ "gram": { "message": "Hello!" } })))
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = common::body_json(res).await?;
    assert_eq!(body["field_errors"]["picture"][0], "can't be blank");
    assert_eq!(body["form"]["message"], "Hello!");
    assert!(app.grams.last().await.is_none());
    Ok(())
}

#[tokio::test]
async fn unsupported_picture_type_is_unprocessable() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;

    let text = common::PicturePart {
        filename: "notes.txt",
        content_type: "text/plain",
        bytes: b"hello".to_vec(),
    };
    let res = app
        .send(common::multipart(Method::POST, "/grams", Some(&token), Some("Hello!"), Some(text)))
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::body_json(res).await?;
    assert!(body["field_errors"]["picture"].is_array());
    assert_eq!(app.pictures.len().await, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_unprocessable_for_signed_in_users_only() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;

    let res = app
        .send(common::form(Method::POST, "/grams", None, "gram%5Bmessage%5D=Hi"))
        .await?;
    common::assert_redirect(&res, "/users/sign_in");

    let mut broken = common::json(Method::POST, "/grams", Some(&token), json!({}));
    *broken.body_mut() = axum::body::Body::from("{oops");
    let res = app.send(broken).await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = common::body_json(res).await?;
    assert!(body["field_errors"]["base"].is_array());
    Ok(())
}
