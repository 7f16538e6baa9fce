pub mod handlers;
pub mod routes;

use serde::{Deserialize, Serialize};

use crate::provider::{Subscription, Voice};

/// Body of `POST /api/generate-audio`. Both fields are optional here so a
/// missing field is reported as a validation error instead of a decode error.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioResponse {
    pub audio_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub voices: Vec<Voice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub subscription: Subscription,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
