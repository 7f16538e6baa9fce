use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

pub const API_KEY_VAR: &str = "ELEVENLABS_API_KEY";
pub const API_BASE_URL_VAR: &str = "ELEVENLABS_API_BASE_URL";
pub const API_MODEL_ID_VAR: &str = "ELEVENLABS_API_MODEL_ID";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{var} must be a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("PORT must be a number, got '{0}'")]
    InvalidPort(String),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Runtime configuration, built once at startup and handed to each component.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: Url,
    pub model_id: String,
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("model_id", &self.model_id)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, API_KEY_VAR)?;
        let api_base_url = parse_base_url(&required(&lookup, API_BASE_URL_VAR)?)?;
        let model_id = required(&lookup, API_MODEL_ID_VAR)?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };
        let static_dir = lookup("STATIC_DIR")
            .unwrap_or_else(|| "static".to_string())
            .into();

        Ok(Self {
            api_key,
            api_base_url,
            model_id,
            host,
            port,
            static_dir,
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

fn required<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(ConfigError::Missing(var)),
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        var: API_BASE_URL_VAR,
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            var: API_BASE_URL_VAR,
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var: API_BASE_URL_VAR,
            reason: "not a base URL".to_string(),
        });
    }

    Ok(url)
}
