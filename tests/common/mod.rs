use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tts_form_server::api::routes::{create_router, AppState};
use tts_form_server::config::Config;
use url::Url;
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const MODEL_ID: &str = "eleven_test_model";

pub fn config(provider: &MockServer, static_dir: &Path) -> Config {
    Config {
        api_key: API_KEY.to_string(),
        api_base_url: Url::parse(&format!("{}/v1", provider.uri())).unwrap(),
        model_id: MODEL_ID.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: static_dir.to_path_buf(),
    }
}

pub fn app(provider: &MockServer, static_dir: &Path) -> Router {
    let state = Arc::new(AppState::new(&config(provider, static_dir)));
    create_router(state)
}
