mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use repairs_api::auth::{generate_jwt, Claims};

use common::TestApp;

#[tokio::test]
async fn public_endpoints_need_no_token() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.send(Method::GET, "/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Repairs API");

    let (status, body) = app.send(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await?;

    for uri in ["/service-tickets", "/service-tickets/1", "/customers", "/employees"] {
        let (status, body) = app.send(Method::GET, uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["error"], true);
    }
    Ok(())
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;
    let forged = generate_jwt(&Claims::new(app.staff.id, &app.staff.username, 1)?, "not-the-secret")?;

    let (status, body) = app.get("/service-tickets", &forged).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap_or_default().contains("Invalid JWT token"));
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_forbidden() -> Result<()> {
    let app = TestApp::new().await?;
    let token = generate_jwt(&Claims::new(9_999, "ghost", 1)?, &app.secret)?;

    let (status, body) = app.get("/service-tickets", &token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn inactive_user_is_forbidden() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.customer_token();
    app.store.deactivate_user(app.customer_user.id).await;

    let (status, _) = app.get("/service-tickets", &token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn username_mismatch_is_forbidden() -> Result<()> {
    let app = TestApp::new().await?;
    let token = generate_jwt(&Claims::new(app.staff.id, "someone-else", 1)?, &app.secret)?;

    let (status, body) = app.get("/service-tickets", &token).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "User authentication mismatch");
    Ok(())
}
