use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::dashboard::{Analytics, DashboardStats},
    error::AppResult,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses((status = 200, description = "Aggregate business stats", body = ApiResponse<DashboardStats>)),
    tag = "Dashboard"
)]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let stats = dashboard_service::stats(&state.orm, user.user_id).await?;
    Ok(Json(ApiResponse::success("Ok", stats, Some(Meta::empty()))))
}

#[utoipa::path(
    get,
    path = "/api/analytics",
    responses((status = 200, description = "Monthly revenue and status breakdown", body = ApiResponse<Analytics>)),
    tag = "Dashboard"
)]
pub async fn analytics(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Analytics>>> {
    let analytics = dashboard_service::analytics(&state.orm, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Ok",
        analytics,
        Some(Meta::empty()),
    )))
}
