use axum::extract::{Path, Query};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::Role;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::{UserQuery, UserUpdate};
use crate::services::{UserProfile, UserService};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// POST /api/users - Provision an account directly (admin only)
///
/// Accounts created here skip email verification and start as USER.
pub async fn create_user(Json(payload): Json<CreateUserRequest>) -> ApiResult<UserProfile> {
    if !payload.email.contains('@') {
        return Err(ApiError::bad_request("A valid email address is required"));
    }

    let user = UserService::new()?
        .create_user(&payload.email, &payload.password, &payload.name, Role::User)
        .await?;

    Ok(ApiResponse::created(user))
}

/// GET /api/users - List users, optionally filtered by email/name/role
pub async fn list_users(Query(query): Query<UserQuery>) -> ApiResult<Vec<UserProfile>> {
    let users = UserService::new()?.get_users(&query).await?;
    Ok(ApiResponse::success(users))
}

/// GET /api/users/:id
pub async fn get_user(Path(id): Path<Uuid>) -> ApiResult<UserProfile> {
    let user = UserService::new()?.get_user(id).await?;
    Ok(ApiResponse::success(user))
}

/// PATCH /api/users/:id - Update name and email
///
/// Role is not accepted here; it only changes through the verification flow.
pub async fn update_user(
    Path(id): Path<Uuid>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<UserProfile> {
    let user = UserService::new()?.update_user(id, &update).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/users/:id
pub async fn delete_user(Path(id): Path<Uuid>) -> ApiResult<Value> {
    UserService::new()?.delete_user(id).await?;
    Ok(ApiResponse::success(json!({
        "message": format!("User with id: {} was successfully deleted", id)
    })))
}
