use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    pub language: Option<String>,
}

/// Telephony webhook payload. `call_id` is echoed for log correlation only;
/// the caller identity comes from the bearer token, not the body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VoiceWebhookRequest {
    #[serde(default)]
    pub transcript: String,
    pub call_id: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoiceWebhookResponse {
    pub response: String,
    pub end_call: bool,
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptionResponse {
    pub text: String,
}
