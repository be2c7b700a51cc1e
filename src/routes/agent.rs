use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};

use crate::{
    agent::{IntentResult, context, executor, resolver},
    dto::agent::ChatRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    services::reminder_service::{self, ReminderOutcome},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

pub fn payments_router() -> Router<AppState> {
    Router::new().route("/{invoice_no}/remind", post(remind))
}

/// Chat pipeline: assemble context, resolve the intent (degrading to the
/// deterministic fallback on NLU trouble), execute, return the full result.
#[utoipa::path(
    post,
    path = "/api/agent/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Resolved intent with message, optional proactive suggestion and action payload"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Agent"
)]
pub async fn chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> AppResult<Json<IntentResult>> {
    let ctx = context::assemble(&state.orm, user.user_id).await?;
    let resolved = resolver::resolve(
        &state.nlu,
        &payload.message,
        payload.language.as_deref(),
        &ctx,
    )
    .await;
    if resolved.degraded {
        tracing::debug!(user_id = %user.user_id, "chat answered from fallback");
    }

    let executed = executor::execute(&state.orm, user.user_id, &ctx, resolved).await?;
    Ok(Json(executed))
}

#[utoipa::path(
    post,
    path = "/api/payments/{invoice_no}/remind",
    responses(
        (status = 200, description = "Delivery attempted or logged", body = ReminderOutcome),
        (status = 404, description = "Invoice not found for this user")
    ),
    tag = "Agent"
)]
pub async fn remind(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invoice_no): Path<String>,
) -> AppResult<Json<ReminderOutcome>> {
    let outcome = reminder_service::send_reminder(&state, &user, &invoice_no).await?;
    Ok(Json(outcome))
}
