use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /auth/signin - Authenticate credentials and receive a JWT
///
/// Unknown email and wrong password produce the same 401 so the endpoint
/// cannot be used to probe which addresses have accounts.
pub async fn signin(Json(payload): Json<SignInRequest>) -> ApiResult<Value> {
    let email = payload
        .email
        .ok_or_else(|| ApiError::bad_request("Missing required field: email"))?;
    let password = payload
        .password
        .ok_or_else(|| ApiError::bad_request("Missing required field: password"))?;

    let user = UserService::new()?.authenticate(&email, &password).await?;

    let token = generate_jwt(&Claims::new(
        user.id,
        user.email.clone(),
        user.name.clone(),
        user.role,
    ))?;

    Ok(ApiResponse::success(json!({ "token": token, "user": user })))
}
