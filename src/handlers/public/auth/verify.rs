use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::UserQuery;
use crate::services::{UserService, VerificationCodeService};

#[derive(Debug, Deserialize)]
pub struct ResendCodeRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

/// POST /auth/resend-code - Issue a fresh verification code by email
pub async fn resend_code(Json(payload): Json<ResendCodeRequest>) -> ApiResult<Value> {
    let users = UserService::new()?;
    let matches = users
        .get_users(&UserQuery {
            email: Some(payload.email.clone()),
            ..Default::default()
        })
        .await?;

    if matches.is_empty() {
        return Err(ApiError::bad_request("No user with that email address"));
    }

    super::signup::send_verification_code(&payload.email).await?;

    Ok(ApiResponse::created(json!({ "message": "Verification code sent" })))
}

/// POST /auth/verify - Redeem a verification code
///
/// On success the account is promoted to USER and a fresh token carrying the
/// new role is returned.
pub async fn verify(Json(payload): Json<VerifyRequest>) -> ApiResult<Value> {
    let user = VerificationCodeService::new()?
        .verify_code(&payload.email, &payload.code)
        .await?;

    let token = generate_jwt(&Claims::new(
        user.id,
        user.email.clone(),
        user.name.clone(),
        user.role,
    ))?;

    Ok(ApiResponse::success(json!({ "token": token, "user": user })))
}
