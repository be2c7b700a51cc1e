use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    entity::invoices::{Column as InvoiceCol, Entity as Invoices},
    error::AppResult,
};

/// A pending invoice older than this many days counts as overdue.
pub const OVERDUE_AFTER_DAYS: i64 = 30;

pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone)]
pub struct OverdueInvoice {
    pub invoice_no: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub amount: f64,
    pub days_since_due: i64,
}

/// Aggregate facts about one user's book, recomputed on every call. Feeds
/// both stat answers and the grounding numbers in the NLU prompt.
#[derive(Debug, Clone, Default)]
pub struct BusinessContext {
    pub total_invoices: i64,
    pub pending_count: i64,
    pub total_revenue: f64,
    pub overdue: Vec<OverdueInvoice>,
}

pub fn is_overdue(status: &str, issued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    status == STATUS_PENDING && (now - issued_at).num_days() > OVERDUE_AFTER_DAYS
}

pub async fn assemble(orm: &OrmConn, user_id: Uuid) -> AppResult<BusinessContext> {
    let invoices = Invoices::find()
        .filter(InvoiceCol::UserId.eq(user_id))
        .all(orm)
        .await?;

    let now = Utc::now();
    let mut ctx = BusinessContext {
        total_invoices: invoices.len() as i64,
        ..Default::default()
    };

    for inv in &invoices {
        ctx.total_revenue += inv.amount;
        if inv.status == STATUS_PENDING {
            ctx.pending_count += 1;
        }
        let issued_at = inv.issued_at.with_timezone(&Utc);
        if is_overdue(&inv.status, issued_at, now) {
            ctx.overdue.push(OverdueInvoice {
                invoice_no: inv.invoice_no.clone(),
                customer_name: inv.customer_name.clone(),
                customer_phone: inv.customer_phone.clone(),
                amount: inv.amount,
                days_since_due: (now - issued_at).num_days(),
            });
        }
    }

    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn overdue_strictly_after_thirty_days() {
        let now = Utc::now();
        assert!(is_overdue("pending", now - Duration::days(31), now));
        assert!(!is_overdue("pending", now - Duration::days(30), now));
    }

    #[test]
    fn paid_invoices_never_overdue() {
        let now = Utc::now();
        assert!(!is_overdue("paid", now - Duration::days(90), now));
        assert!(!is_overdue("overdue", now - Duration::days(90), now));
    }
}
