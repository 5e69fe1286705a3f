pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::extract::{Path, Request};
use axum::middleware::{from_fn, Next};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::auth::Role;
use crate::middleware::{enforce_scope, enforce_self_or, jwt_auth_middleware};

/// Build the full application router
///
/// Lives in the library so integration tests can drive the router directly
/// without binding a socket.
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition and verification)
        .merge(auth_public_routes())
        // Protected API
        .merge(whoami_routes())
        .merge(user_routes())
        .merge(resource_routes())
        .merge(item_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/resend-code", post(auth::resend_code))
        .route("/auth/verify", post(auth::verify))
}

fn whoami_routes() -> Router {
    use handlers::protected::auth;

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route_layer(from_fn(jwt_auth_middleware))
}

fn user_routes() -> Router {
    use axum::routing::post;
    use handlers::protected::users;

    // Collection routes are admin-only; record routes allow the owner too
    let collection = Router::new()
        .route("/api/users", post(users::create_user).get(users::list_users))
        .route_layer(from_fn(|req: Request, next: Next| {
            enforce_scope(Role::Admin, req, next)
        }));

    let record = Router::new()
        .route(
            "/api/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(from_fn(|path: Path<Uuid>, req: Request, next: Next| {
            enforce_self_or(Role::Admin, path, req, next)
        }));

    collection
        .merge(record)
        .route_layer(from_fn(jwt_auth_middleware))
}

fn resource_routes() -> Router {
    use axum::routing::{delete, post};
    use handlers::protected::resources;

    // Verified users read and write; deletion is reserved for admins
    let user_level = Router::new()
        .route(
            "/api/resources",
            post(resources::create_resource).get(resources::list_resources),
        )
        .route(
            "/api/resources/:id",
            get(resources::get_resource).patch(resources::update_resource),
        )
        .route_layer(from_fn(|req: Request, next: Next| {
            enforce_scope(Role::User, req, next)
        }));

    let admin_level = Router::new()
        .route("/api/resources/:id", delete(resources::delete_resource))
        .route_layer(from_fn(|req: Request, next: Next| {
            enforce_scope(Role::Admin, req, next)
        }));

    user_level
        .merge(admin_level)
        .route_layer(from_fn(jwt_auth_middleware))
}

fn item_routes() -> Router {
    use axum::routing::{delete, post};
    use handlers::protected::items;

    let user_level = Router::new()
        .route("/api/items", post(items::create_item).get(items::list_items))
        .route(
            "/api/items/:id",
            get(items::get_item).patch(items::update_item),
        )
        .route_layer(from_fn(|req: Request, next: Next| {
            enforce_scope(Role::User, req, next)
        }));

    let admin_level = Router::new()
        .route("/api/items/:id", delete(items::delete_item))
        .route_layer(from_fn(|req: Request, next: Next| {
            enforce_scope(Role::Admin, req, next)
        }));

    user_level
        .merge(admin_level)
        .route_layer(from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Scope API",
            "version": version,
            "description": "Scoped-role CRUD API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/signup, /auth/signin, /auth/resend-code, /auth/verify (public)",
                "whoami": "/api/auth/whoami (protected)",
                "users": "/api/users[/:id] (protected, admin or self)",
                "resources": "/api/resources[/:id] (protected)",
                "items": "/api/items[/:id] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
