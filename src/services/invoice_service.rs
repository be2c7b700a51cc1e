use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use crate::{
    agent::context::STATUS_PENDING,
    audit::log_audit,
    db::OrmConn,
    dto::invoices::CreateInvoiceRequest,
    entity::{
        customers::{ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers},
        invoices::{ActiveModel as InvoiceActive, Column as InvoiceCol, Entity as Invoices},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Invoice, InvoiceItem},
    state::AppState,
};

pub const GST_RATE: f64 = 0.18;

const VALID_STATUSES: [&str; 3] = ["pending", "paid", "overdue"];

/// Invoice amount is the line-item sum; GST is a fixed 18% computed once at
/// creation and never recomputed on status changes.
pub fn compute_totals(items: &[InvoiceItem]) -> (f64, f64, f64) {
    let amount: f64 = items.iter().map(|i| i.quantity * i.unit_price).sum();
    (amount, amount * GST_RATE, amount * (1.0 + GST_RATE))
}

pub fn invoice_from_entity(model: crate::entity::invoices::Model) -> Invoice {
    let items: Vec<InvoiceItem> = serde_json::from_value(model.items).unwrap_or_default();
    Invoice {
        id: model.id,
        invoice_no: model.invoice_no,
        user_id: model.user_id,
        customer_name: model.customer_name,
        customer_phone: model.customer_phone,
        items,
        amount: model.amount,
        gst_amount: model.gst_amount,
        total_with_gst: model.total_with_gst,
        status: model.status,
        issued_at: model.issued_at.with_timezone(&Utc),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub async fn create_invoice(
    state: &AppState,
    user: &AuthUser,
    payload: CreateInvoiceRequest,
) -> AppResult<Invoice> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Invoice needs at least one item".into()));
    }

    let (amount, gst_amount, total_with_gst) = compute_totals(&payload.items);
    let now = Utc::now();
    let items_json = serde_json::to_value(&payload.items)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    let id = Uuid::new_v4();
    let invoice = InvoiceActive {
        id: Set(id),
        invoice_no: Set(build_invoice_no(id)),
        user_id: Set(user.user_id),
        customer_name: Set(payload.customer_name.clone()),
        customer_phone: Set(payload.customer_phone.clone()),
        items: Set(items_json),
        amount: Set(amount),
        gst_amount: Set(gst_amount),
        total_with_gst: Set(total_with_gst),
        status: Set(STATUS_PENDING.into()),
        issued_at: Set(now.into()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    upsert_customer_totals(
        &state.orm,
        user.user_id,
        &payload.customer_name,
        &payload.customer_phone,
        amount,
    )
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "invoice_created",
        Some("invoices"),
        Some(serde_json::json!({ "invoice_no": invoice.invoice_no.clone() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(invoice_from_entity(invoice))
}

/// Create the customer on first invoice for a phone number, otherwise bump
/// the running totals. Read-then-write without a transaction: concurrent
/// creations for the same phone can lose an increment.
async fn upsert_customer_totals(
    orm: &OrmConn,
    user_id: Uuid,
    name: &str,
    phone: &str,
    amount: f64,
) -> AppResult<()> {
    let existing = Customers::find()
        .filter(
            Condition::all()
                .add(CustomerCol::UserId.eq(user_id))
                .add(CustomerCol::Phone.eq(phone)),
        )
        .one(orm)
        .await?;

    match existing {
        None => {
            CustomerActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                name: Set(name.to_string()),
                phone: Set(phone.to_string()),
                email: Set(None),
                address: Set(None),
                total_invoices: Set(1),
                total_amount: Set(amount),
                pending_amount: Set(amount),
                created_at: NotSet,
            }
            .insert(orm)
            .await?;
        }
        Some(customer) => {
            let total_invoices = customer.total_invoices + 1;
            let total_amount = customer.total_amount + amount;
            let pending_amount = customer.pending_amount + amount;
            let mut active: CustomerActive = customer.into();
            active.total_invoices = Set(total_invoices);
            active.total_amount = Set(total_amount);
            active.pending_amount = Set(pending_amount);
            active.update(orm).await?;
        }
    }

    Ok(())
}

/// Newest-first invoices for a user, optionally filtered by status. Shared by
/// the chat executor (limit 5) and the voice adapter (limit 3).
pub async fn recent(
    orm: &OrmConn,
    user_id: Uuid,
    status: Option<&str>,
    limit: u64,
) -> AppResult<Vec<crate::entity::invoices::Model>> {
    let mut condition = Condition::all().add(InvoiceCol::UserId.eq(user_id));
    if let Some(status) = status {
        condition = condition.add(InvoiceCol::Status.eq(status));
    }

    let invoices = Invoices::find()
        .filter(condition)
        .order_by_desc(InvoiceCol::CreatedAt)
        .limit(limit)
        .all(orm)
        .await?;
    Ok(invoices)
}

pub async fn list_invoices(
    orm: &OrmConn,
    user_id: Uuid,
    limit: Option<u64>,
) -> AppResult<Vec<Invoice>> {
    let mut finder = Invoices::find()
        .filter(InvoiceCol::UserId.eq(user_id))
        .order_by_desc(InvoiceCol::CreatedAt);
    if let Some(limit) = limit {
        finder = finder.limit(limit);
    }

    let invoices = finder.all(orm).await?;
    Ok(invoices.into_iter().map(invoice_from_entity).collect())
}

pub async fn get_invoice(orm: &OrmConn, user_id: Uuid, invoice_no: &str) -> AppResult<Invoice> {
    let invoice = find_scoped(orm, user_id, invoice_no).await?;
    Ok(invoice_from_entity(invoice))
}

pub async fn find_scoped(
    orm: &OrmConn,
    user_id: Uuid,
    invoice_no: &str,
) -> AppResult<crate::entity::invoices::Model> {
    Invoices::find()
        .filter(
            Condition::all()
                .add(InvoiceCol::UserId.eq(user_id))
                .add(InvoiceCol::InvoiceNo.eq(invoice_no)),
        )
        .one(orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn update_status(
    orm: &OrmConn,
    user_id: Uuid,
    invoice_no: &str,
    status: &str,
) -> AppResult<Invoice> {
    if !VALID_STATUSES.contains(&status) {
        return Err(AppError::BadRequest(format!("Unknown status {status}")));
    }

    let invoice = find_scoped(orm, user_id, invoice_no).await?;
    let mut active: InvoiceActive = invoice.into();
    active.status = Set(status.to_string());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(orm).await?;
    Ok(invoice_from_entity(updated))
}

pub async fn delete_invoice(orm: &OrmConn, user_id: Uuid, invoice_no: &str) -> AppResult<()> {
    let result = Invoices::delete_many()
        .filter(
            Condition::all()
                .add(InvoiceCol::UserId.eq(user_id))
                .add(InvoiceCol::InvoiceNo.eq(invoice_no)),
        )
        .exec(orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Customer-facing invoice number, distinct from the database id.
pub fn build_invoice_no(id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = id.to_string();
    let short = &suffix[..8];
    format!("INV-{date}-{short}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, unit_price: f64) -> InvoiceItem {
        InvoiceItem {
            description: "item".into(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn amount_is_line_item_sum() {
        let (amount, gst, total) = compute_totals(&[item(2.0, 150.0), item(1.0, 700.0)]);
        assert_eq!(amount, 1000.0);
        assert_eq!(gst, 1000.0 * 0.18);
        assert_eq!(total, 1000.0 * 1.18);
    }

    #[test]
    fn empty_items_total_zero() {
        let (amount, gst, total) = compute_totals(&[]);
        assert_eq!(amount, 0.0);
        assert_eq!(gst, 0.0);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn gst_is_exactly_eighteen_percent() {
        let (amount, gst, total) = compute_totals(&[item(3.0, 99.99)]);
        assert_eq!(gst, amount * 0.18);
        assert_eq!(total, amount * 1.18);
    }
}
