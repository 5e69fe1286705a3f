use std::sync::Once;

use axum::body::Body;
use axum::http::Request;
use uuid::Uuid;

use scope_api::auth::{generate_jwt, Claims, Role};

static INIT: Once = Once::new();

/// Pin the environment the router reads at first use
///
/// The JWT secret must be present before any test touches the config
/// singleton, and DATABASE_URL is cleared so requests that reach storage
/// fail deterministically (503) instead of depending on a live database.
/// Tests run in parallel threads, so the mutation happens exactly once.
pub fn init_env() {
    INIT.call_once(|| {
        std::env::set_var("AUTH_SECRET", "test-secret");
        std::env::remove_var("DATABASE_URL");
    });
}

/// Mint a token for a fresh principal with the given role
pub fn token_for(role: Role) -> (Uuid, String) {
    let id = Uuid::new_v4();
    let claims = Claims::new(
        id,
        format!("{}@example.com", role.as_str().to_lowercase()),
        "Test".to_string(),
        role,
    );
    let token = generate_jwt(&claims).expect("test token");
    (id, token)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

pub fn request_with_token(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("valid JSON body")
}
