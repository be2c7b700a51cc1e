use serde_json::{Value, json};
use uuid::Uuid;

use super::{context, executor};
use crate::{
    error::AppResult,
    services::{customer_service, invoice_service, reminder_service},
    state::AppState,
};

/// Intent space covered by the keyword matcher. Everything the matcher does
/// not recognize goes to the conversational NLU path instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceIntent {
    Dashboard,
    Invoices,
    Pending,
    Remind,
    Customers,
}

/// Keyword-first routing over the lower-cased transcript. Pure so the
/// keyword-vs-NLU ordering is directly testable.
pub fn match_keywords(transcript: &str) -> Option<VoiceIntent> {
    let t = transcript.to_lowercase();
    if t.contains("dashboard") || t.contains("stats") || t.contains("overview") {
        Some(VoiceIntent::Dashboard)
    } else if t.contains("invoice") || t.contains("bill") {
        Some(VoiceIntent::Invoices)
    } else if t.contains("pending") || t.contains("payment") {
        Some(VoiceIntent::Pending)
    } else if t.contains("remind") {
        Some(VoiceIntent::Remind)
    } else if t.contains("customer") {
        Some(VoiceIntent::Customers)
    } else {
        None
    }
}

#[derive(Debug)]
pub struct VoiceReply {
    pub response: String,
    pub end_call: bool,
    pub data: Option<Value>,
}

impl VoiceReply {
    fn spoken(response: String, data: Option<Value>) -> Self {
        Self {
            response,
            end_call: false,
            data,
        }
    }
}

/// Handle one telephony transcript. Never errors out: database and
/// collaborator failures degrade to an apology with `end_call: false`.
pub async fn handle_transcript(state: &AppState, user_id: Uuid, transcript: &str) -> VoiceReply {
    match route(state, user_id, transcript).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!(error = %err, "voice routing failed");
            VoiceReply::spoken(
                "Sorry, मुझे कुछ technical issue हुआ। Please try again.".to_string(),
                None,
            )
        }
    }
}

async fn route(state: &AppState, user_id: Uuid, transcript: &str) -> AppResult<VoiceReply> {
    let Some(intent) = match_keywords(transcript) else {
        return Ok(conversational(state, transcript).await);
    };

    let reply = match intent {
        VoiceIntent::Dashboard => {
            let ctx = context::assemble(&state.orm, user_id).await?;
            let customers = customer_service::count(&state.orm, user_id).await?;
            let response = format!(
                "आपका business dashboard यह है: Total revenue है {} rupees. आपके पास {} invoices हैं, जिनमें से {} pending हैं। और आपके {} customers हैं।",
                ctx.total_revenue, ctx.total_invoices, ctx.pending_count, customers
            );
            let data = json!({
                "totalRevenue": ctx.total_revenue,
                "totalInvoices": ctx.total_invoices,
                "pendingPayments": ctx.pending_count,
                "totalCustomers": customers,
            });
            VoiceReply::spoken(response, Some(data))
        }
        VoiceIntent::Invoices => {
            let invoices = invoice_service::recent(&state.orm, user_id, None, 3).await?;
            if invoices.is_empty() {
                VoiceReply::spoken(
                    "आपके पास कोई invoices नहीं हैं। Would you like to create one?".to_string(),
                    Some(json!({ "invoices": [] })),
                )
            } else {
                let mut response = format!("आपके latest {} invoices हैं: ", invoices.len());
                for (idx, inv) in invoices.iter().enumerate() {
                    response.push_str(&format!(
                        "{}. {} के लिए {} rupees. ",
                        idx + 1,
                        inv.customer_name,
                        inv.amount
                    ));
                }
                let summaries: Vec<_> = invoices.iter().map(executor::summarize).collect();
                VoiceReply::spoken(response, Some(json!({ "invoices": summaries })))
            }
        }
        VoiceIntent::Pending => {
            let pending =
                invoice_service::recent(&state.orm, user_id, Some(context::STATUS_PENDING), 3)
                    .await?;
            if pending.is_empty() {
                VoiceReply::spoken(
                    "बहुत बढ़िया! You have no pending payments.".to_string(),
                    Some(json!({ "pendingInvoices": [] })),
                )
            } else {
                let mut response = format!("आपके {} pending payments हैं: ", pending.len());
                for (idx, inv) in pending.iter().enumerate() {
                    response.push_str(&format!(
                        "{}. {} से {} rupees. ",
                        idx + 1,
                        inv.customer_name,
                        inv.amount
                    ));
                }
                response.push_str("Should I send reminders?");
                let summaries: Vec<_> = pending.iter().map(executor::summarize).collect();
                VoiceReply::spoken(response, Some(json!({ "pendingInvoices": summaries })))
            }
        }
        VoiceIntent::Remind => {
            let pending =
                invoice_service::recent(&state.orm, user_id, Some(context::STATUS_PENDING), 1)
                    .await?;
            match pending.first() {
                None => {
                    VoiceReply::spoken("No pending payments to remind about.".to_string(), None)
                }
                Some(inv) => {
                    // Voice calls carry no business context, so the generic
                    // label is used for the sender line.
                    let outcome = reminder_service::deliver_for_invoice(
                        state,
                        inv,
                        reminder_service::DEFAULT_BUSINESS_NAME,
                    )
                    .await?;
                    let response = if outcome.success {
                        format!(
                            "Payment reminder sent to {} via WhatsApp successfully!",
                            inv.customer_name
                        )
                    } else {
                        format!("Reminder logged for {}.", inv.customer_name)
                    };
                    VoiceReply::spoken(
                        response,
                        Some(json!({ "reminderSent": true, "customer": inv.customer_name })),
                    )
                }
            }
        }
        VoiceIntent::Customers => {
            let customers = customer_service::recent(&state.orm, user_id, 3).await?;
            if customers.is_empty() {
                VoiceReply::spoken("आपके पास कोई customers नहीं हैं yet.".to_string(), None)
            } else {
                let mut response = format!("आपके {} customers हैं: ", customers.len());
                for (idx, customer) in customers.iter().enumerate() {
                    response.push_str(&format!(
                        "{}. {}, pending है {} rupees. ",
                        idx + 1,
                        customer.name,
                        customer.pending_amount
                    ));
                }
                let listed: Vec<_> = customers
                    .iter()
                    .map(|c| {
                        json!({
                            "name": c.name,
                            "phone": c.phone,
                            "pendingAmount": c.pending_amount,
                        })
                    })
                    .collect();
                VoiceReply::spoken(response, Some(json!({ "customers": listed })))
            }
        }
    };

    Ok(reply)
}

/// Free-text fallback for transcripts outside the keyword space. Expects
/// conversational output only; a provider failure degrades to a help prompt.
async fn conversational(state: &AppState, transcript: &str) -> VoiceReply {
    let persona = format!(
        "You are Bharat Biz-Agent voice assistant. Respond in a mix of Hindi and English (Hinglish) in a natural, conversational way. Keep responses short and clear for voice. User said: \"{transcript}\". Provide helpful business information."
    );

    match state.nlu.complete(&persona, transcript, Some(150)).await {
        Ok(reply) => VoiceReply::spoken(reply, None),
        Err(err) => {
            tracing::warn!(error = %err, "conversational NLU failed");
            VoiceReply::spoken(
                "मैं आपकी मदद कर सकता हूं। Please ask about dashboard, invoices, payments, or customers."
                    .to_string(),
                None,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_transcript_stays_on_keyword_path() {
        assert_eq!(
            match_keywords("show my dashboard"),
            Some(VoiceIntent::Dashboard)
        );
        assert_eq!(
            match_keywords("Give me an OVERVIEW please"),
            Some(VoiceIntent::Dashboard)
        );
    }

    #[test]
    fn unmatched_transcript_goes_to_nlu() {
        assert_eq!(match_keywords("what is the weather"), None);
    }

    #[test]
    fn keyword_priority_follows_branch_order() {
        // "invoice" wins over "pending" because the invoice branch is
        // checked first.
        assert_eq!(
            match_keywords("pending invoice list"),
            Some(VoiceIntent::Invoices)
        );
        assert_eq!(
            match_keywords("payment reminder bhejo"),
            Some(VoiceIntent::Pending)
        );
    }

    #[test]
    fn remind_and_customer_keywords() {
        assert_eq!(match_keywords("send a reminder"), Some(VoiceIntent::Remind));
        assert_eq!(
            match_keywords("mere customer dikhao"),
            Some(VoiceIntent::Customers)
        );
    }
}
