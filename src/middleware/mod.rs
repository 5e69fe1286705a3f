pub mod auth;
pub mod response;
pub mod scope;
pub mod self_guard;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use scope::enforce_scope;
pub use self_guard::enforce_self_or;
