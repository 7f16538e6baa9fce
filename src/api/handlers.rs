use axum::{body::Bytes, extract::State, Json};
use std::sync::Arc;

use super::{
    GenerateAudioRequest, GenerateAudioResponse, HealthResponse, SubscriptionResponse,
    VoicesResponse,
};
use crate::api::routes::AppState;
use crate::error::AppError;

const MISSING_FIELDS: &str = "Text and voiceId are required.";

pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VoicesResponse>, AppError> {
    let voices = state.provider.list_voices().await?;
    Ok(Json(VoicesResponse { voices }))
}

pub async fn subscription(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let subscription = state.provider.subscription().await?;
    Ok(Json(SubscriptionResponse { subscription }))
}

pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateAudioResponse>, AppError> {
    // Decoded by hand so the Content-Type header is not required
    let request: GenerateAudioRequest = serde_json::from_slice(&body)?;

    // Validate input before anything reaches the provider
    let (text, voice_id) = match (request.text, request.voice_id) {
        (Some(text), Some(voice_id)) if !text.is_empty() && !voice_id.is_empty() => {
            (text, voice_id)
        }
        _ => return Err(AppError::BadRequest(MISSING_FIELDS.into())),
    };

    // The slot is only touched once the full clip has arrived
    let audio = state.provider.synthesize(&text, &voice_id).await?;
    let audio_url = state.audio.store(&audio).await?;

    Ok(Json(GenerateAudioResponse { audio_url }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
