use reqwest::multipart;
use serde::Deserialize;

use super::ClientError;

const TRANSCRIPTIONS_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const MODEL: &str = "whisper-1";

/// Whisper speech-to-text client. Audio bytes in, transcript text out.
#[derive(Clone)]
pub struct TranscriptionClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct Transcription {
    text: String,
}

impl TranscriptionClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// Transcribe raw audio bytes with a source-language hint.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
        language: &str,
    ) -> Result<String, ClientError> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::Unconfigured)?;

        let part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/webm")
            .map_err(|e| ClientError::Provider(e.to_string()))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("model", MODEL)
            .text("language", language.to_string());

        let response = self
            .http
            .post(TRANSCRIPTIONS_URL)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::Provider(detail));
        }

        let transcription: Transcription = response.json().await?;
        Ok(transcription.text)
    }
}
