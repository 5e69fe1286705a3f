// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (external service issues)
    BadGateway(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway(_) => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::auth::ScopeError> for ApiError {
    fn from(err: crate::auth::ScopeError) -> Self {
        // A broken scope table is a server misconfiguration, never a denial
        tracing::error!("Scope registry error: {}", err);
        ApiError::internal_server_error("Authorization configuration error")
    }
}

impl From<crate::auth::JwtError> for ApiError {
    fn from(err: crate::auth::JwtError) -> Self {
        tracing::error!("JWT error: {}", err);
        ApiError::internal_server_error("Failed to issue authentication token")
    }
}

impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        tracing::error!("Database error: {}", err);
        ApiError::service_unavailable("Database temporarily unavailable")
    }
}

impl From<crate::services::user_service::UserError> for ApiError {
    fn from(err: crate::services::user_service::UserError) -> Self {
        use crate::services::user_service::UserError;
        match err {
            UserError::NotFound(id) => ApiError::not_found(format!("User not found: {}", id)),
            UserError::EmailTaken => {
                ApiError::conflict("Email address already associated to a user")
            }
            UserError::InvalidCredentials => {
                ApiError::unauthorized("Error authenticating email and password")
            }
            UserError::InvalidRole(role) => {
                tracing::error!("Stored role is not recognized: {}", role);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hashing error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            UserError::Database(e) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("User query error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            UserError::Pool(e) => e.into(),
        }
    }
}

impl From<crate::services::verification_code_service::VerificationError> for ApiError {
    fn from(err: crate::services::verification_code_service::VerificationError) -> Self {
        use crate::services::verification_code_service::VerificationError;
        match err {
            VerificationError::UserNotFound(_) => ApiError::not_found("User not found"),
            VerificationError::AlreadyVerified => {
                ApiError::unauthorized("This user is already verified.")
            }
            VerificationError::WrongCode => ApiError::unauthorized("Wrong verification code."),
            VerificationError::CodeExpired => {
                ApiError::unauthorized("Verification code expired.")
            }
            VerificationError::CodeNotFound(_) => {
                ApiError::unauthorized("Wrong verification code.")
            }
            VerificationError::User(e) => e.into(),
            VerificationError::Database(e) => {
                tracing::error!("Verification code query error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            VerificationError::Pool(e) => e.into(),
        }
    }
}

impl From<crate::services::resource_service::ResourceError> for ApiError {
    fn from(err: crate::services::resource_service::ResourceError) -> Self {
        use crate::services::resource_service::ResourceError;
        match err {
            ResourceError::NotFound(id) => {
                ApiError::not_found(format!("Resource not found: {}", id))
            }
            ResourceError::Database(e) => {
                tracing::error!("Resource query error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            ResourceError::Pool(e) => e.into(),
        }
    }
}

impl From<crate::services::item_service::ItemError> for ApiError {
    fn from(err: crate::services::item_service::ItemError) -> Self {
        use crate::services::item_service::ItemError;
        match err {
            ItemError::NotFound(id) => ApiError::not_found(format!("Item not found: {}", id)),
            ItemError::Database(e) => {
                tracing::error!("Item query error: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            ItemError::Pool(e) => e.into(),
        }
    }
}

impl From<crate::services::mailer::MailError> for ApiError {
    fn from(err: crate::services::mailer::MailError) -> Self {
        use crate::services::mailer::MailError;
        match err {
            MailError::NotConfigured => {
                tracing::error!("Mailer is not configured");
                ApiError::service_unavailable("Email delivery is not configured")
            }
            MailError::Request(e) => {
                tracing::error!("SendGrid request error: {}", e);
                ApiError::bad_gateway("Failed to send email")
            }
            MailError::Rejected(status) => {
                tracing::error!("SendGrid rejected message with status {}", status);
                ApiError::bad_gateway("Failed to send email")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
