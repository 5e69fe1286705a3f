mod common;

use anyhow::Result;
use axum::http::StatusCode;
use tower::ServiceExt;

use scope_api::auth::Role;

#[tokio::test]
async fn missing_authorization_header_is_rejected() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let response = app.oneshot(common::get("/api/auth/whoami")).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = common::body_json(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn malformed_bearer_token_is_rejected() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let response = app
        .oneshot(common::get_with_token("/api/auth/whoami", "not-a-jwt"))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let request = axum::http::Request::builder()
        .uri("/api/auth/whoami")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn valid_token_reaches_whoami() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (id, token) = common::token_for(Role::User);
    let response = app
        .oneshot(common::get_with_token("/api/auth/whoami", &token))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], id.to_string());
    assert_eq!(body["data"]["role"], "USER");
    Ok(())
}

#[tokio::test]
async fn signin_requires_email_and_password() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let response = app
        .oneshot(common::post_json("/auth/signin", "{}"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = common::body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
