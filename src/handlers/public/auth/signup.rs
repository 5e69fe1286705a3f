use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::auth::{generate_jwt, Claims, Role};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Mailer, UserService, VerificationCodeService};

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// POST /auth/signup - Create an account and send a verification code
///
/// New accounts start UNVERIFIED; the returned token carries that role, so
/// protected routes stay closed until the emailed code is submitted.
pub async fn signup(Json(payload): Json<SignUpRequest>) -> ApiResult<Value> {
    if !payload.email.contains('@') {
        return Err(ApiError::bad_request("A valid email address is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::bad_request("Missing required field: password"));
    }
    if payload.name.is_empty() {
        return Err(ApiError::bad_request("Missing required field: name"));
    }

    let users = UserService::new()?;
    let user = users
        .create_user(&payload.email, &payload.password, &payload.name, Role::Unverified)
        .await?;

    // A failed send does not roll back the account; the code can be re-sent
    if let Err(e) = send_verification_code(&user.email).await {
        warn!("Failed to send verification code to {}: {}", user.email, e);
    }

    let token = generate_jwt(&Claims::new(
        user.id,
        user.email.clone(),
        user.name.clone(),
        user.role,
    ))?;

    Ok(ApiResponse::created(json!({ "token": token, "user": user })))
}

pub(super) async fn send_verification_code(email: &str) -> Result<(), ApiError> {
    let codes = VerificationCodeService::new()?;
    let code = codes.create_verification_code(email).await?;

    let ttl = crate::config::config().email.verification_code_ttl_minutes;
    let message = format!(
        "You must enter this code in the app before you can gain access; \
         it will expire in {} minutes. Your code is: {}",
        ttl, code.code
    );

    Mailer::new()
        .send_email(email, "Verification Code", &message)
        .await?;
    Ok(())
}
