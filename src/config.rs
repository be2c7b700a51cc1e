use std::env;

/// Auth tokens still carrying the sample value from .env.example are treated
/// as unset so a fresh checkout stays usable without a Twilio account.
pub const TWILIO_PLACEHOLDER_TOKEN: &str = "your_twilio_auth_token_here";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub openai_api_key: Option<String>,
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_whatsapp_number: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            database_url,
            host,
            port,
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            twilio_account_sid: non_empty_env("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: non_empty_env("TWILIO_AUTH_TOKEN"),
            twilio_whatsapp_number: non_empty_env("TWILIO_WHATSAPP_NUMBER"),
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
