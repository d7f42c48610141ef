use devconnect_api::{app, config, store::manager::StoreManager};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Devconnect API in {:?} mode", config.environment);

    // Collections are created lazily-idempotently; a store that is down at
    // boot surfaces through /health instead of preventing startup.
    if let Err(e) = StoreManager::ensure_collections().await {
        tracing::warn!("Document store not ready at startup: {}", e);
    }

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Devconnect API listening on http://{}", bind_addr);

    axum::serve(listener, app())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server");

    StoreManager::close().await;
    tracing::info!("Devconnect API stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown signal handler: {}", e);
    }
}
