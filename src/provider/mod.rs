pub mod types;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::config::Config;
use crate::error::AppError;

pub use types::{Subscription, Voice};
use types::{SynthesisBody, VoiceCatalog};

const API_KEY_HEADER: &str = "xi-api-key";

pub const VOICES_FAILED: &str = "Failed to fetch voices";
pub const SUBSCRIPTION_FAILED: &str = "Failed to fetch subscription data";
pub const GENERATION_FAILED: &str = "Failed to generate audio";

/// Thin client for the hosted text-to-speech provider.
///
/// Every call goes straight to the provider: nothing is cached and nothing
/// is retried.
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    base_url: Url,
    api_key: String,
    model_id: String,
}

impl ProviderClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            model_id: config.model_id.clone(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub async fn list_voices(&self) -> Result<Vec<Voice>, AppError> {
        let url = self.endpoint(&["voices"]);
        let response = self.send(self.http.get(url), VOICES_FAILED).await?;
        let catalog: VoiceCatalog = serde_json::from_slice(&response.bytes().await?)?;

        tracing::debug!("Provider returned {} voices", catalog.voices.len());
        Ok(catalog.voices)
    }

    pub async fn subscription(&self) -> Result<Subscription, AppError> {
        let url = self.endpoint(&["user", "subscription"]);
        let response = self.send(self.http.get(url), SUBSCRIPTION_FAILED).await?;
        let subscription: Subscription = serde_json::from_slice(&response.bytes().await?)?;
        Ok(subscription)
    }

    /// Synthesize `text` with the given voice and return the raw audio bytes.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, AppError> {
        let url = self.endpoint(&["text-to-speech", voice_id]);
        let request = self
            .http
            .post(url)
            .header(ACCEPT, "audio/mpeg")
            .json(&SynthesisBody {
                text,
                model_id: &self.model_id,
            });

        let response = self.send(request, GENERATION_FAILED).await?;
        let audio = response.bytes().await?;

        tracing::info!(
            voice_id,
            chars = text.chars().count(),
            bytes = audio.len(),
            "Synthesized audio"
        );
        Ok(audio.to_vec())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Config validation rejects cannot-be-a-base URLs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        request: RequestBuilder,
        context: &'static str,
    ) -> Result<Response, AppError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                context,
                status,
                body,
            });
        }

        Ok(response)
    }
}
