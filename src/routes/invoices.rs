use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};

use crate::{
    dto::invoices::{CreateInvoiceRequest, InvoiceList, InvoiceListQuery, UpdateInvoiceStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Invoice,
    response::{ApiResponse, Meta},
    services::invoice_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route(
            "/{invoice_no}",
            get(get_invoice).put(update_status).delete(delete_invoice),
        )
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    params(("limit" = Option<u64>, Query, description = "Cap the number of invoices returned")),
    responses((status = 200, description = "Invoices, newest first", body = ApiResponse<InvoiceList>)),
    tag = "Invoices"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<InvoiceListQuery>,
) -> AppResult<Json<ApiResponse<InvoiceList>>> {
    let items = invoice_service::list_invoices(&state.orm, user.user_id, query.limit).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Ok",
        InvoiceList { items },
        Some(Meta::new(1, total, total)),
    )))
}

#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 200, description = "Invoice created", body = ApiResponse<Invoice>),
        (status = 400, description = "Empty item list")
    ),
    tag = "Invoices"
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateInvoiceRequest>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let invoice = invoice_service::create_invoice(&state, &user, payload).await?;
    Ok(Json(ApiResponse::success(
        "Invoice created successfully",
        invoice,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/invoices/{invoice_no}",
    responses(
        (status = 200, description = "Invoice detail", body = ApiResponse<Invoice>),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invoice_no): Path<String>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let invoice = invoice_service::get_invoice(&state.orm, user.user_id, &invoice_no).await?;
    Ok(Json(ApiResponse::success(
        "Ok",
        invoice,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    put,
    path = "/api/invoices/{invoice_no}",
    request_body = UpdateInvoiceStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Invoice>),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invoice_no): Path<String>,
    Json(payload): Json<UpdateInvoiceStatusRequest>,
) -> AppResult<Json<ApiResponse<Invoice>>> {
    let invoice =
        invoice_service::update_status(&state.orm, user.user_id, &invoice_no, &payload.status)
            .await?;
    Ok(Json(ApiResponse::success(
        "Invoice updated successfully",
        invoice,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/invoices/{invoice_no}",
    responses(
        (status = 200, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found")
    ),
    tag = "Invoices"
)]
pub async fn delete_invoice(
    State(state): State<AppState>,
    user: AuthUser,
    Path(invoice_no): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    invoice_service::delete_invoice(&state.orm, user.user_id, &invoice_no).await?;
    Ok(Json(ApiResponse::success(
        "Invoice deleted successfully",
        serde_json::json!({ "invoice_no": invoice_no }),
        Some(Meta::empty()),
    )))
}
