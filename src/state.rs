use crate::{
    clients::{messaging::MessagingClient, nlu::NluClient, transcribe::TranscriptionClient},
    config::AppConfig,
    db::{DbPool, OrmConn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub nlu: NluClient,
    pub messaging: MessagingClient,
    pub transcriber: TranscriptionClient,
}

impl AppState {
    /// Build all shared process-lifetime resources once; requests reuse the
    /// same pool, ORM connection and HTTP client for their whole lifetime.
    pub fn new(pool: DbPool, orm: OrmConn, config: &AppConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            pool,
            orm,
            nlu: NluClient::new(http.clone(), config.openai_api_key.clone()),
            messaging: MessagingClient::new(
                http.clone(),
                config.twilio_account_sid.clone(),
                config.twilio_auth_token.clone(),
                config.twilio_whatsapp_number.clone(),
            ),
            transcriber: TranscriptionClient::new(http, config.openai_api_key.clone()),
        }
    }
}
