use axum::{
    Json, Router,
    extract::{Multipart, State},
    routing::post,
};

use crate::{
    agent::voice,
    dto::agent::{TranscriptionResponse, VoiceWebhookRequest, VoiceWebhookResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/webhook", post(webhook))
}

/// Speech-to-text for the browser voice channel. The one collaborator call
/// whose failure surfaces: there is no useful fallback transcript.
#[utoipa::path(
    post,
    path = "/api/voice/transcribe",
    responses(
        (status = 200, description = "Transcript text", body = TranscriptionResponse),
        (status = 400, description = "No audio file provided"),
        (status = 500, description = "Transcription failed")
    ),
    tag = "Voice"
)]
pub async fn transcribe(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<TranscriptionResponse>> {
    let mut audio: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("audio") {
            let file_name = field
                .file_name()
                .unwrap_or("audio.webm")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            audio = Some((file_name, bytes.to_vec()));
        }
    }

    let (file_name, bytes) = audio
        .ok_or_else(|| AppError::BadRequest("No audio file provided".into()))?;

    // Hindi hint; Whisper still copes with Hinglish and English.
    let text = state
        .transcriber
        .transcribe(bytes, &file_name, "hi")
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Transcription failed: {e}")))?;

    Ok(Json(TranscriptionResponse { text }))
}

/// Telephony webhook. Keyword-matched intents answer from the database; the
/// rest goes to the conversational NLU path. Never returns an error body:
/// every failure becomes a spoken apology with end_call=false.
#[utoipa::path(
    post,
    path = "/api/voice/webhook",
    request_body = VoiceWebhookRequest,
    responses((status = 200, description = "Spoken-style reply", body = VoiceWebhookResponse)),
    tag = "Voice"
)]
pub async fn webhook(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<VoiceWebhookRequest>,
) -> Json<VoiceWebhookResponse> {
    if payload.transcript.trim().is_empty() {
        return Json(VoiceWebhookResponse {
            response: "Sorry, I did not catch that. Please repeat.".to_string(),
            end_call: false,
            data: None,
        });
    }

    tracing::info!(
        call_id = payload.call_id.as_deref().unwrap_or("-"),
        transcript = %payload.transcript,
        "voice transcript received"
    );

    let reply = voice::handle_transcript(&state, user.user_id, &payload.transcript).await;
    Json(VoiceWebhookResponse {
        response: reply.response,
        end_call: reply.end_call,
        data: reply.data,
    })
}
