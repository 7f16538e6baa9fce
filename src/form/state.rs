use crate::provider::{Subscription, Voice};

pub const VOICES_ALERT: &str = "There was an error fetching the voices.";
pub const QUOTA_ALERT: &str = "There was an error fetching the subscription data.";
pub const GENERATION_ALERT: &str = "There was an error generating the audio.";
pub const GENERATION_SUCCESS: &str = "Audio generated successfully.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched yet.
    Idle,
    /// Voice list and quota requests are in flight.
    FetchingContext,
    /// Quota is known; the form can be used.
    Ready,
    /// A synthesis request is in flight.
    Generating,
    /// The quota could not be fetched, so the form cannot be used.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Blocking message the user has to acknowledge.
    Alert(String),
    /// Transient confirmation.
    Success(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub text: String,
    pub voice_id: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateBlocked {
    #[error("The form is not ready")]
    NotReady,
    #[error("Please select a voice.")]
    NoVoice,
    #[error("Please enter some text.")]
    EmptyText,
    #[error("Character count exceeds the limit.")]
    OverQuota { length: u64, available: u64 },
}

/// Session-local state of the text-to-audio form.
#[derive(Debug, Clone)]
pub struct FormState {
    phase: Phase,
    voices: Vec<Voice>,
    voices_settled: bool,
    selected_voice: Option<String>,
    subscription: Option<Subscription>,
    quota_settled: bool,
    text: String,
    audio_url: Option<String>,
    notices: Vec<Notice>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            voices: Vec::new(),
            voices_settled: false,
            selected_voice: None,
            subscription: None,
            quota_settled: false,
            text: String::new(),
            audio_url: None,
            notices: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn selected_voice(&self) -> Option<&str> {
        self.selected_voice.as_deref()
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn begin_fetch(&mut self) {
        self.phase = Phase::FetchingContext;
        self.voices_settled = false;
        self.quota_settled = false;
    }

    /// Store the voice catalog and default the selection to its first entry.
    pub fn voices_loaded(&mut self, voices: Vec<Voice>) {
        self.selected_voice = voices.first().map(|v| v.voice_id.clone());
        self.voices = voices;
        self.voices_settled = true;
        self.settle();
    }

    pub fn voices_failed(&mut self) {
        self.notices.push(Notice::Alert(VOICES_ALERT.to_string()));
        self.voices_settled = true;
        self.settle();
    }

    pub fn quota_loaded(&mut self, subscription: Subscription) {
        self.subscription = Some(subscription);
        self.quota_settled = true;
        self.settle();
    }

    pub fn quota_failed(&mut self) {
        self.notices.push(Notice::Alert(QUOTA_ALERT.to_string()));
        self.quota_settled = true;
        self.settle();
    }

    pub fn select_voice(&mut self, voice_id: impl Into<String>) {
        self.selected_voice = Some(voice_id.into());
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear_text(&mut self) {
        self.text.clear();
    }

    /// Forget the local reference; the server-side file is left alone.
    pub fn clear_audio(&mut self) {
        self.audio_url = None;
    }

    pub fn text_length(&self) -> u64 {
        self.text.chars().count() as u64
    }

    /// Characters left according to the last fetched quota snapshot.
    pub fn available_characters(&self) -> Option<u64> {
        self.subscription.as_ref().map(Subscription::available)
    }

    /// The "used / available" counter shown under the text box.
    pub fn character_usage(&self) -> String {
        format!(
            "Characters used: {} / {} available",
            self.text_length(),
            self.available_characters().unwrap_or(0)
        )
    }

    pub fn generate_disabled(&self) -> bool {
        self.generate_blocker().is_some()
    }

    fn generate_blocker(&self) -> Option<GenerateBlocked> {
        let available = match self.available_characters() {
            Some(available) => available,
            None => return Some(GenerateBlocked::NotReady),
        };
        let length = self.text_length();

        if self.selected_voice.as_deref().map_or(true, str::is_empty) {
            Some(GenerateBlocked::NoVoice)
        } else if length == 0 {
            Some(GenerateBlocked::EmptyText)
        } else if length > available {
            Some(GenerateBlocked::OverQuota { length, available })
        } else {
            None
        }
    }

    /// Enter `Generating` and hand back the request to send.
    pub fn begin_generate(&mut self) -> Result<GenerationRequest, GenerateBlocked> {
        if self.phase != Phase::Ready {
            return Err(GenerateBlocked::NotReady);
        }
        if let Some(blocked) = self.generate_blocker() {
            return Err(blocked);
        }

        self.phase = Phase::Generating;
        Ok(GenerationRequest {
            text: self.text.clone(),
            voice_id: self.selected_voice.clone().unwrap_or_default(),
        })
    }

    /// Record the clip URL with a cache-busting timestamp.
    pub fn generation_succeeded(&mut self, audio_url: &str, timestamp_ms: i64) {
        self.audio_url = Some(format!("{}?timestamp={}", audio_url, timestamp_ms));
        self.notices.push(Notice::Success(GENERATION_SUCCESS.to_string()));
        self.phase = Phase::Ready;
    }

    pub fn generation_failed(&mut self) {
        self.notices.push(Notice::Alert(GENERATION_ALERT.to_string()));
        self.phase = Phase::Ready;
    }

    fn settle(&mut self) {
        if self.phase != Phase::FetchingContext {
            return;
        }
        if self.subscription.is_some() {
            self.phase = Phase::Ready;
        } else if self.voices_settled && self.quota_settled {
            self.phase = Phase::Error(QUOTA_ALERT.to_string());
        }
    }
}
