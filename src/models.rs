use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub business_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One line on an invoice. Quantities and unit prices are taken as given;
/// the invoice amount is their sum at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: Uuid,
    /// Display number ("INV-...") used in customer-facing messages and URLs.
    pub invoice_no: String,
    pub user_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub items: Vec<InvoiceItem>,
    pub amount: f64,
    pub gst_amount: f64,
    pub total_with_gst: f64,
    pub status: String,
    pub issued_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub total_invoices: i64,
    pub total_amount: f64,
    pub pending_amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Audit-trail substitute for a WhatsApp send when Twilio is not configured.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_no: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
}
