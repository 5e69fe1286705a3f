#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = scope_api::config::config();
    tracing::info!("Starting Scope API in {:?} mode", config.environment);

    let app = scope_api::app();

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Scope API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
