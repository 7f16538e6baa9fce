use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::config::Config;
use crate::provider::ProviderClient;
use crate::storage::AudioStore;

pub struct AppState {
    pub provider: ProviderClient,
    pub audio: AudioStore,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            provider: ProviderClient::new(config),
            audio: AudioStore::new(&config.static_dir),
            static_dir: config.static_dir.clone(),
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/voices", get(handlers::list_voices))
        .route("/subscription", get(handlers::subscription))
        .route("/generate-audio", post(handlers::generate_audio))
        .route("/health", get(handlers::health));

    let static_files = ServeDir::new(&state.static_dir).append_index_html_on_directories(true);

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
