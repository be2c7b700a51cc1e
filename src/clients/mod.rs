use thiserror::Error;

pub mod messaging;
pub mod nlu;
pub mod transcribe;

/// Failures from outbound collaborator calls. Callers decide whether a
/// failure degrades (agent, reminders, voice) or surfaces (transcription).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("provider not configured")]
    Unconfigured,

    #[error("provider error: {0}")]
    Provider(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}
