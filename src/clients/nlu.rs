use serde::Deserialize;
use serde_json::json;

use super::ClientError;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

/// Chat-completions client used for both structured intent extraction and
/// free-text conversational replies on the voice path.
#[derive(Clone)]
pub struct NluClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl NluClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// Send a system instruction plus user text, return the raw reply text.
    pub async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: Option<u32>,
    ) -> Result<String, ClientError> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::Unconfigured)?;

        let mut body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": 0.7,
        });
        if let Some(max) = max_tokens {
            body["max_tokens"] = json!(max);
        }

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::Provider(detail));
        }

        let completion: ChatCompletion = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ClientError::Provider("empty choices in reply".into()))?;

        Ok(content)
    }
}
