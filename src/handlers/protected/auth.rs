use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - Current principal as seen by the middleware
pub async fn whoami(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": auth_user.id,
        "email": auth_user.email,
        "name": auth_user.name,
        "role": auth_user.role,
    })))
}
