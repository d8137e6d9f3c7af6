mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn owner_destroys_gram_and_its_picture() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, ada) = app.sign_up("ada@example.com").await?;
    let gram = app.create_gram(&ada, "Hello!").await?;
    let path = format!("/grams/{}", gram.id);

    let res = app.send(common::delete(&path, Some(&ada))).await?;
    common::assert_redirect(&res, "/");

    assert!(app.grams.last().await.is_none());
    assert!(!app.pictures.contains(&gram.picture.key).await);

    let res = app.send(common::get(&path, Some(&ada))).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn repeated_destroy_is_not_found() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, ada) = app.sign_up("ada@example.com").await?;
    let gram = app.create_gram(&ada, "Hello!").await?;
    let path = format!("/grams/{}", gram.id);

    let first = app.send(common::delete(&path, Some(&ada))).await?;
    common::assert_redirect(&first, "/");

    let second = app.send(common::delete(&path, Some(&ada))).await?;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn other_user_cannot_destroy() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, ada) = app.sign_up("ada@example.com").await?;
    let (_, bob) = app.sign_up("bob@example.com").await?;
    let gram = app.create_gram(&ada, "Hello!").await?;

    let res = app.send(common::delete(&format!("/grams/{}", gram.id), Some(&bob))).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(app.grams.last().await.is_some());
    assert!(app.pictures.contains(&gram.picture.key).await);
    Ok(())
}

#[tokio::test]
async fn anonymous_destroy_redirects_and_keeps_gram() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, ada) = app.sign_up("ada@example.com").await?;
    let gram = app.create_gram(&ada, "Hello!").await?;

    let res = app.send(common::delete(&format!("/grams/{}", gram.id), None)).await?;
    common::assert_redirect(&res, "/users/sign_in");
    assert!(app.grams.last().await.is_some());

    let res = app.send(common::delete("/grams/TACOCAT", None)).await?;
    common::assert_redirect(&res, "/users/sign_in");
    Ok(())
}
