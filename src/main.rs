use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tts_form_server::api::routes::{create_router, AppState};
use tts_form_server::config::Config;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration from environment; nothing runs without it
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Error in environment variables: {}", e);
            std::process::exit(1);
        }
    };
    let addr = match config.listen_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("TTS Form Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Provider: {}", config.api_base_url);
    tracing::info!("Static directory: {}", config.static_dir.display());

    let state = Arc::new(AppState::new(&config));
    tracing::info!("Model: {}", state.provider.model_id());

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
