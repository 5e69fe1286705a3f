use axum::{extract::Request, middleware::Next, response::Response};
use tracing::warn;

use super::auth::AuthUser;
use crate::auth::{Role, ScopeRegistry};
use crate::error::ApiError;

/// Route guard requiring a minimum role to access the protected route
///
/// The request proceeds when the principal's authority covers `minimum`,
/// so an admin passes every guard its subscopes would pass. Wire per route
/// group with `axum::middleware::from_fn` and a closure supplying `minimum`.
/// Runs after `jwt_auth_middleware`.
pub async fn enforce_scope(
    minimum: Role,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required"))?;

    // UnknownRole maps to a 500 through ApiError: a misconfigured scope
    // table must never read as a legitimate denial.
    let permitted = ScopeRegistry::builtin().has_authority_over(auth_user.role, minimum)?;

    if !permitted {
        warn!(
            "Scope check failed: {} has role {}, route requires {}",
            auth_user.email, auth_user.role, minimum
        );
        return Err(ApiError::forbidden("Unauthorized"));
    }

    Ok(next.run(request).await)
}
