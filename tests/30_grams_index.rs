mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn index_is_public() -> Result<()> {
    let app = common::TestApp::spawn()?;

    for path in ["/", "/grams"] {
        let res = app.send(common::get(path, None)).await?;
        assert_eq!(res.status(), StatusCode::OK, "GET {}", path);
        let body = common::body_json(res).await?;
        assert_eq!(body["view"], "grams/index");
        assert_eq!(body["data"]["total"], 0);
    }
    Ok(())
}

#[tokio::test]
async fn index_lists_newest_first() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;
    app.create_gram(&token, "first").await?;
    app.create_gram(&token, "second").await?;

    let res = app.send(common::get("/", None)).await?;
    let body = common::body_json(res).await?;
    let grams = body["data"]["grams"].as_array().cloned().unwrap_or_default();

    assert_eq!(grams.len(), 2);
    assert_eq!(grams[0]["attributes"]["message"], "second");
    assert_eq!(grams[1]["attributes"]["message"], "first");
    Ok(())
}

#[tokio::test]
async fn index_paginates() -> Result<()> {
    let app = common::TestApp::spawn()?;
    let (_, token) = app.sign_up("ada@example.com").await?;
    for i in 0..3 {
        app.create_gram(&token, &format!("gram {}", i)).await?;
    }

    let res = app.send(common::get("/?page=2&per_page=2", None)).await?;
    let body = common::body_json(res).await?;
    assert_eq!(body["data"]["page"], 2);
    assert_eq!(body["data"]["per_page"], 2);
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["grams"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["links"]["prev"], "/?page=1&per_page=2");
    assert!(body["data"]["links"].get("next").is_none());
    Ok(())
}

#[tokio::test]
async fn malformed_pagination_falls_back_to_defaults() -> Result<()> {
    let app = common::TestApp::spawn()?;

    let res = app.send(common::get("/?page=abc&per_page=-1", None)).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = common::body_json(res).await?;
    assert_eq!(body["data"]["page"], 1);
    assert_eq!(body["data"]["per_page"], 25);
    Ok(())
}
