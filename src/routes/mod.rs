use axum::{Router, routing::get};

use crate::state::AppState;

pub mod agent;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod invoices;
pub mod voice;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/dashboard", dashboard::router())
        .route("/analytics", get(dashboard::analytics))
        .nest("/invoices", invoices::router())
        .nest("/customers", customers::router())
        .nest("/agent", agent::router())
        .nest("/payments", agent::payments_router())
        .nest("/voice", voice::router())
}
