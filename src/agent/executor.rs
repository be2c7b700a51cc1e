use chrono::Utc;
use uuid::Uuid;

use super::{
    ActionResult, Intent, IntentResult, InvoiceSummary, OverdueSummary, StatsSnapshot, context,
    context::BusinessContext,
};
use crate::{db::OrmConn, entity::invoices, error::AppResult, services::invoice_service};

/// How many invoices a chat answer lists at most.
const LIST_LIMIT: u64 = 5;

pub fn summarize(inv: &invoices::Model) -> InvoiceSummary {
    InvoiceSummary {
        id: inv.invoice_no.clone(),
        customer_name: inv.customer_name.clone(),
        amount: inv.amount,
        status: inv.status.clone(),
        date: inv.issued_at.with_timezone(&Utc),
    }
}

/// Run the handler for a resolved intent and attach its payload. Implemented
/// intents are read-only; mutating intents (create_invoice, send_reminder)
/// are acknowledged conversationally but not executed from here.
pub async fn execute(
    orm: &OrmConn,
    user_id: Uuid,
    ctx: &BusinessContext,
    mut result: IntentResult,
) -> AppResult<IntentResult> {
    match &result.intent {
        Intent::CheckStats => {
            let fresh = context::assemble(orm, user_id).await?;
            let overdue_count = fresh.overdue.len() as i64;
            result.action_result = Some(ActionResult::Stats(StatsSnapshot {
                total_revenue: fresh.total_revenue,
                total_invoices: fresh.total_invoices,
                pending_payments: fresh.pending_count,
                overdue_payments: overdue_count,
            }));
            // The resolver may already carry a suggestion; never overwrite it.
            if overdue_count > 0 && result.proactive_suggestion.is_none() {
                result.proactive_suggestion = Some(format!(
                    "{overdue_count} invoices are overdue > 30 days. Should I send reminders?"
                ));
            }
        }
        Intent::ListInvoices | Intent::CheckPending => {
            let status = match result.intent {
                Intent::CheckPending => Some(context::STATUS_PENDING),
                _ => None,
            };
            let invoices = invoice_service::recent(orm, user_id, status, LIST_LIMIT).await?;
            result.action_result = Some(ActionResult::Invoices {
                invoices: invoices.iter().map(summarize).collect(),
            });
        }
        Intent::ListOverdue => {
            let invoices = ctx
                .overdue
                .iter()
                .take(LIST_LIMIT as usize)
                .map(|inv| OverdueSummary {
                    id: inv.invoice_no.clone(),
                    customer_name: inv.customer_name.clone(),
                    amount: inv.amount,
                    days_since_due: inv.days_since_due,
                })
                .collect();
            result.action_result = Some(ActionResult::Overdue { invoices });
        }
        Intent::CreateInvoice | Intent::SendReminder | Intent::Unrecognized(_) => {}
    }

    Ok(result)
}
