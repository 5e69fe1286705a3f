use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::auth::{Role, ScopeRegistry};
use crate::error::ApiError;

/// Route guard restricting `/:id` routes to the record's owner
///
/// `admin_override` names the role whose authority bypasses the ownership
/// check, so admins can operate on any user's records. Runs after
/// `jwt_auth_middleware` on routes whose path carries the target user id.
pub async fn enforce_self_or(
    admin_override: Role,
    Path(id): Path<Uuid>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required"))?;

    if auth_user.id != id {
        let overridden =
            ScopeRegistry::builtin().has_authority_over(auth_user.role, admin_override)?;
        if !overridden {
            warn!(
                "Self check failed: {} attempted to access records of {}",
                auth_user.id, id
            );
            return Err(ApiError::forbidden("Unauthorized"));
        }
    }

    Ok(next.run(request).await)
}
