use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use board_api::{build_router, config::Config, state::AppState};
use board_persist::{seed_sample_data, BoardStoreBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting board API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize the store
    tracing::info!(backend = ?config.store.backend, "Connecting to store");
    let store = BoardStoreBuilder::new()
        .backend(config.store.backend)
        .mongodb_uri(&config.mongodb_uri)
        .database(&config.mongodb.database)
        .pool_size(config.mongodb.pool_size)
        .timeout_ms(config.mongodb.timeout_ms)
        .build()
        .await?;

    if config.store.seed_sample_data {
        seed_sample_data(store.as_ref()).await?;
    }

    tracing::info!("Store ready");

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), store));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
