use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    agent::context::STATUS_PENDING,
    db::OrmConn,
    dto::dashboard::{Analytics, DashboardStats, StatusBreakdown},
    entity::invoices::{Column as InvoiceCol, Entity as Invoices},
    error::AppResult,
    services::customer_service,
};

pub async fn stats(orm: &OrmConn, user_id: Uuid) -> AppResult<DashboardStats> {
    let invoices = Invoices::find()
        .filter(InvoiceCol::UserId.eq(user_id))
        .all(orm)
        .await?;

    let total_revenue = invoices.iter().map(|inv| inv.amount).sum();
    let pending_payments = invoices
        .iter()
        .filter(|inv| inv.status == STATUS_PENDING)
        .count() as i64;
    let total_customers = customer_service::count(orm, user_id).await?;

    Ok(DashboardStats {
        total_revenue,
        total_invoices: invoices.len() as i64,
        pending_payments,
        total_customers,
    })
}

/// Monthly revenue plus a status breakdown. Months are keyed "YYYY-MM" so
/// the map sorts chronologically.
pub async fn analytics(orm: &OrmConn, user_id: Uuid) -> AppResult<Analytics> {
    let invoices = Invoices::find()
        .filter(InvoiceCol::UserId.eq(user_id))
        .all(orm)
        .await?;

    let mut revenue_by_month: BTreeMap<String, f64> = BTreeMap::new();
    let mut breakdown = StatusBreakdown {
        paid: 0,
        pending: 0,
        overdue: 0,
    };
    let mut total_revenue = 0.0;

    for inv in &invoices {
        let month = inv.issued_at.format("%Y-%m").to_string();
        *revenue_by_month.entry(month).or_insert(0.0) += inv.amount;
        total_revenue += inv.amount;
        match inv.status.as_str() {
            "paid" => breakdown.paid += 1,
            "pending" => breakdown.pending += 1,
            "overdue" => breakdown.overdue += 1,
            _ => {}
        }
    }

    Ok(Analytics {
        revenue_by_month,
        status_breakdown: breakdown,
        total_revenue,
    })
}
