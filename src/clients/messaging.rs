use crate::config::TWILIO_PLACEHOLDER_TOKEN;

use super::ClientError;

/// Twilio WhatsApp sender. When credentials are missing or still the sample
/// placeholder the client reports itself unconfigured and callers fall back
/// to logging a reminder row instead of sending.
#[derive(Clone)]
pub struct MessagingClient {
    http: reqwest::Client,
    account_sid: Option<String>,
    auth_token: Option<String>,
    from_number: Option<String>,
}

impl MessagingClient {
    pub fn new(
        http: reqwest::Client,
        account_sid: Option<String>,
        auth_token: Option<String>,
        from_number: Option<String>,
    ) -> Self {
        Self {
            http,
            account_sid,
            auth_token,
            from_number,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(
            (&self.account_sid, &self.auth_token, &self.from_number),
            (Some(_), Some(token), Some(_)) if token != TWILIO_PLACEHOLDER_TOKEN
        )
    }

    /// Deliver a WhatsApp text to `to_phone`. A non-success HTTP outcome is
    /// returned as `ClientError::Provider` with the raw provider payload.
    pub async fn send_whatsapp(&self, to_phone: &str, body: &str) -> Result<(), ClientError> {
        let (sid, token, from) = match (&self.account_sid, &self.auth_token, &self.from_number) {
            (Some(sid), Some(token), Some(from)) => (sid, token, from),
            _ => return Err(ClientError::Unconfigured),
        };

        let url = format!("https://api.twilio.com/2010-04-01/Accounts/{sid}/Messages.json");
        let to = format!("whatsapp:{to_phone}");
        let form = [
            ("From", from.as_str()),
            ("To", to.as_str()),
            ("Body", body),
        ];

        let response = self
            .http
            .post(&url)
            .basic_auth(sid, Some(token))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::Provider(detail));
        }

        Ok(())
    }
}
