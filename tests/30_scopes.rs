mod common;

use anyhow::Result;
use axum::http::StatusCode;
use tower::ServiceExt;
use uuid::Uuid;

use scope_api::auth::Role;

// These tests run the assembled router without a database: a request that
// clears every guard fails at the storage layer with 503, so "not 401/403"
// is the signal that authorization let it through.
const STORAGE_UNAVAILABLE: StatusCode = StatusCode::SERVICE_UNAVAILABLE;

#[tokio::test]
async fn admin_token_passes_the_admin_guard() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (_, token) = common::token_for(Role::Admin);
    let response = app
        .oneshot(common::get_with_token("/api/users", &token))
        .await?;
    assert_eq!(response.status(), STORAGE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn user_token_is_denied_by_the_admin_guard() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (_, token) = common::token_for(Role::User);
    let response = app
        .oneshot(common::get_with_token("/api/users", &token))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = common::body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
    assert_eq!(body["message"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn admin_authority_extends_to_user_routes() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (_, token) = common::token_for(Role::Admin);
    let response = app
        .oneshot(common::get_with_token("/api/resources", &token))
        .await?;
    assert_eq!(response.status(), STORAGE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn unverified_token_is_denied_by_the_user_guard() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (_, token) = common::token_for(Role::Unverified);
    let response = app
        .oneshot(common::get_with_token("/api/resources", &token))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn resource_deletion_is_admin_only() -> Result<()> {
    common::init_env();

    let id = Uuid::new_v4();
    let (_, user_token) = common::token_for(Role::User);
    let response = scope_api::app()
        .oneshot(common::request_with_token(
            "DELETE",
            &format!("/api/resources/{}", id),
            &user_token,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let (_, admin_token) = common::token_for(Role::Admin);
    let response = scope_api::app()
        .oneshot(common::request_with_token(
            "DELETE",
            &format!("/api/resources/{}", id),
            &admin_token,
        ))
        .await?;
    assert_eq!(response.status(), STORAGE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn users_may_access_their_own_record() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (id, token) = common::token_for(Role::User);
    let response = app
        .oneshot(common::get_with_token(&format!("/api/users/{}", id), &token))
        .await?;
    assert_eq!(response.status(), STORAGE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn users_may_not_access_another_users_record() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (_, token) = common::token_for(Role::User);
    let other = Uuid::new_v4();
    let response = app
        .oneshot(common::get_with_token(&format!("/api/users/{}", other), &token))
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admins_override_the_ownership_check() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    let (_, token) = common::token_for(Role::Admin);
    let other = Uuid::new_v4();
    let response = app
        .oneshot(common::get_with_token(&format!("/api/users/{}", other), &token))
        .await?;
    assert_eq!(response.status(), STORAGE_UNAVAILABLE);
    Ok(())
}

#[tokio::test]
async fn guards_run_after_authentication() -> Result<()> {
    common::init_env();
    let app = scope_api::app();

    // No token at all: the JWT middleware answers before any scope check
    let response = app.oneshot(common::get("/api/users")).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
