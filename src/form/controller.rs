use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use url::Url;

use super::state::{FormState, GenerateBlocked, GenerationRequest, Notice};
use crate::api::{
    GenerateAudioRequest, GenerateAudioResponse, SubscriptionResponse, VoicesResponse,
};
use crate::provider::{Subscription, Voice};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server responded with {0}")]
    Status(StatusCode),

    #[error("Invalid server URL: {0}")]
    Url(#[from] url::ParseError),
}

/// The three endpoints the form talks to.
#[async_trait]
pub trait FormBackend: Send + Sync {
    async fn voices(&self) -> Result<Vec<Voice>, ClientError>;

    async fn subscription(&self) -> Result<Subscription, ClientError>;

    /// Returns the URL of the generated clip as reported by the server.
    async fn generate_audio(&self, request: &GenerationRequest) -> Result<String, ClientError>;
}

/// `FormBackend` over HTTP against a running server.
#[derive(Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }
}

fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(response.status()))
    }
}

#[async_trait]
impl FormBackend for HttpBackend {
    async fn voices(&self) -> Result<Vec<Voice>, ClientError> {
        let response = check(self.http.get(self.url("/api/voices")?).send().await?)?;
        let body: VoicesResponse = response.json().await?;
        Ok(body.voices)
    }

    async fn subscription(&self) -> Result<Subscription, ClientError> {
        let response = check(self.http.get(self.url("/api/subscription")?).send().await?)?;
        let body: SubscriptionResponse = response.json().await?;
        Ok(body.subscription)
    }

    async fn generate_audio(&self, request: &GenerationRequest) -> Result<String, ClientError> {
        let payload = GenerateAudioRequest {
            text: Some(request.text.clone()),
            voice_id: Some(request.voice_id.clone()),
        };
        let response = check(
            self.http
                .post(self.url("/api/generate-audio")?)
                .json(&payload)
                .send()
                .await?,
        )?;
        let body: GenerateAudioResponse = response.json().await?;
        Ok(body.audio_url)
    }
}

/// Drives a `FormState` through user actions, calling the backend as needed.
pub struct FormController<B> {
    backend: B,
    state: FormState,
}

impl<B: FormBackend> FormController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: FormState::new(),
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.state.take_notices()
    }

    /// Fetch the voice catalog and the quota. Failures raise an alert and
    /// leave whatever did arrive in place; nothing is retried.
    pub async fn mount(&mut self) {
        self.state.begin_fetch();

        let (voices, quota) = tokio::join!(self.backend.voices(), self.backend.subscription());

        match voices {
            Ok(voices) => self.state.voices_loaded(voices),
            Err(e) => {
                tracing::warn!("Error fetching voices: {}", e);
                self.state.voices_failed();
            }
        }
        match quota {
            Ok(subscription) => self.state.quota_loaded(subscription),
            Err(e) => {
                tracing::warn!("Error fetching subscription data: {}", e);
                self.state.quota_failed();
            }
        }
    }

    pub fn select_voice(&mut self, voice_id: impl Into<String>) {
        self.state.select_voice(voice_id);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.state.set_text(text);
    }

    pub fn clear_text(&mut self) {
        self.state.clear_text();
    }

    pub fn clear_audio(&mut self) {
        self.state.clear_audio();
    }

    /// Run one generation. A blocked trigger leaves the state untouched;
    /// otherwise the form is back in `Ready` when this returns.
    pub async fn generate(&mut self) -> Result<(), GenerateBlocked> {
        let request = self.state.begin_generate()?;

        match self.backend.generate_audio(&request).await {
            Ok(audio_url) => {
                let timestamp = chrono::Utc::now().timestamp_millis();
                self.state.generation_succeeded(&audio_url, timestamp);

                match self.backend.subscription().await {
                    Ok(subscription) => self.state.quota_loaded(subscription),
                    Err(e) => {
                        tracing::warn!("Error refreshing subscription data: {}", e);
                        self.state.quota_failed();
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Error generating audio: {}", e);
                self.state.generation_failed();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::{Phase, GENERATION_ALERT, GENERATION_SUCCESS, QUOTA_ALERT};
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    /// In-memory backend that charges generated characters against a quota.
    struct FakeBackend {
        voices: Option<Vec<Voice>>,
        limit: u64,
        used: AtomicU64,
        quota_up: bool,
        quota_up_after_generation: bool,
        generation_up: bool,
        generate_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                voices: Some(vec![Voice {
                    voice_id: "v1".into(),
                    name: "Alice".into(),
                    category: None,
                    preview_url: None,
                }]),
                limit: 5000,
                used: AtomicU64::new(4990),
                quota_up: true,
                quota_up_after_generation: true,
                generation_up: true,
                generate_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FormBackend for FakeBackend {
        async fn voices(&self) -> Result<Vec<Voice>, ClientError> {
            self.voices
                .clone()
                .ok_or(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        }

        async fn subscription(&self) -> Result<Subscription, ClientError> {
            let generated = self.generate_calls.load(Ordering::SeqCst) > 0;
            if !self.quota_up || (generated && !self.quota_up_after_generation) {
                return Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            Ok(Subscription::new(self.used.load(Ordering::SeqCst), self.limit))
        }

        async fn generate_audio(&self, request: &GenerationRequest) -> Result<String, ClientError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            if !self.generation_up {
                return Err(ClientError::Status(StatusCode::INTERNAL_SERVER_ERROR));
            }
            self.used
                .fetch_add(request.text.chars().count() as u64, Ordering::SeqCst);
            Ok("/audios/audio.mp3".to_string())
        }
    }

    #[tokio::test]
    async fn test_mount_selects_default_voice() {
        let mut form = FormController::new(FakeBackend::new());
        form.mount().await;

        assert_eq!(form.state().phase(), &Phase::Ready);
        assert_eq!(form.state().selected_voice(), Some("v1"));
        assert_eq!(form.state().available_characters(), Some(10));
        assert!(form.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_generate_refreshes_quota() {
        let mut form = FormController::new(FakeBackend::new());
        form.mount().await;
        form.set_text("0123456789");

        form.generate().await.unwrap();

        let url = form.state().audio_url().unwrap();
        assert!(url.starts_with("/audios/audio.mp3?timestamp="));
        assert_eq!(form.state().available_characters(), Some(0));
        assert!(form.state().generate_disabled());
        assert_eq!(
            form.take_notices(),
            vec![Notice::Success(GENERATION_SUCCESS.to_string())]
        );
    }

    #[tokio::test]
    async fn test_blocked_generate_never_calls_backend() {
        let mut form = FormController::new(FakeBackend::new());
        form.mount().await;
        form.set_text("01234567890");

        assert!(matches!(
            form.generate().await,
            Err(GenerateBlocked::OverQuota { .. })
        ));
        assert_eq!(form.backend.generate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.state().phase(), &Phase::Ready);
    }

    #[tokio::test]
    async fn test_generation_failure_alerts() {
        let mut backend = FakeBackend::new();
        backend.generation_up = false;
        let mut form = FormController::new(backend);
        form.mount().await;
        form.set_text("hi");

        form.generate().await.unwrap();

        assert!(!form.state().is_generating());
        assert!(form.state().audio_url().is_none());
        assert_eq!(
            form.take_notices(),
            vec![Notice::Alert(GENERATION_ALERT.to_string())]
        );
    }

    #[tokio::test]
    async fn test_quota_failure_on_mount() {
        let mut backend = FakeBackend::new();
        backend.quota_up = false;
        let mut form = FormController::new(backend);
        form.mount().await;

        assert!(matches!(form.state().phase(), Phase::Error(_)));
        assert_eq!(form.state().selected_voice(), Some("v1"));
        assert_eq!(
            form.take_notices(),
            vec![Notice::Alert(QUOTA_ALERT.to_string())]
        );
    }

    #[tokio::test]
    async fn test_quota_refresh_failure_keeps_clip() {
        let mut backend = FakeBackend::new();
        backend.quota_up_after_generation = false;
        let mut form = FormController::new(backend);
        form.mount().await;
        form.set_text("hello");

        form.generate().await.unwrap();

        assert_eq!(form.state().phase(), &Phase::Ready);
        assert!(form
            .state()
            .audio_url()
            .unwrap()
            .starts_with("/audios/audio.mp3?timestamp="));
        // Snapshot from mount, before the five characters were charged
        assert_eq!(form.state().available_characters(), Some(10));
        assert_eq!(
            form.take_notices(),
            vec![
                Notice::Success(GENERATION_SUCCESS.to_string()),
                Notice::Alert(QUOTA_ALERT.to_string()),
            ]
        );
    }
}
