use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::customers::{CreateCustomerRequest, CustomerList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Customer,
    response::{ApiResponse, Meta},
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_customers).post(add_customer))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    responses((status = 200, description = "Customers, newest first", body = ApiResponse<CustomerList>)),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let items = customer_service::list_customers(&state.orm, user.user_id).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Ok",
        CustomerList { items },
        Some(Meta::new(1, total, total)),
    )))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 200, description = "Customer added", body = ApiResponse<Customer>),
        (status = 400, description = "Phone already on file")
    ),
    tag = "Customers"
)]
pub async fn add_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let customer = customer_service::add_customer(&state.orm, user.user_id, payload).await?;
    Ok(Json(ApiResponse::success(
        "Customer added successfully",
        customer,
        Some(Meta::empty()),
    )))
}
