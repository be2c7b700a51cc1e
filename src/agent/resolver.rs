use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Intent, IntentResult, context::BusinessContext};
use crate::clients::nlu::NluClient;

/// Strict reply contract expected from the NLU collaborator. `intent` and
/// `message` are required; anything else defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReply {
    intent: Option<String>,
    #[serde(default)]
    params: Map<String, Value>,
    message: Option<String>,
    #[serde(default)]
    needs_confirmation: bool,
    proactive_suggestion: Option<String>,
}

pub fn system_prompt(ctx: &BusinessContext) -> String {
    format!(
        r#"You are Bharat Biz-Agent, an AI assistant for Indian small businesses. You understand Hindi, Hinglish, and English.

You are ACTION-ORIENTED, not just conversational. You understand India-specific business context (GST, UPI, credit cycles), handle code-mixed language (Hindi+English), and provide proactive suggestions.

CONTEXT:
- User has {total} total invoices
- {pending} pending payments
- {overdue} invoices overdue > 30 days
- Total revenue: Rs {revenue}

Extract intent and provide an actionable response.

Possible intents:
- create_invoice: Create a new invoice (requires customer_name, customer_phone, amount)
- check_stats: Check business statistics
- send_reminder: Send payment reminder (requires customer_name)
- list_invoices: List all invoices
- check_pending: Check pending payments
- list_overdue: List overdue payments

ALWAYS respond in the SAME language as user input.

Respond in JSON format:
{{
  "intent": "intent_name",
  "params": {{}},
  "message": "response in user's language",
  "needsConfirmation": boolean,
  "proactiveSuggestion": "optional proactive suggestion if relevant"
}}"#,
        total = ctx.total_invoices,
        pending = ctx.pending_count,
        overdue = ctx.overdue.len(),
        revenue = ctx.total_revenue,
    )
}

/// Parse the collaborator reply against the contract. `None` means the reply
/// is unusable and the caller must fall back.
pub fn parse_reply(raw: &str) -> Option<IntentResult> {
    let reply: RawReply = serde_json::from_str(raw).ok()?;
    let intent = Intent::from_label(&reply.intent?);
    let message = reply.message?;
    Some(IntentResult {
        intent,
        params: reply.params,
        message,
        needs_confirmation: reply.needs_confirmation,
        proactive_suggestion: reply.proactive_suggestion,
        action_result: None,
        degraded: false,
    })
}

/// Deterministic degrade-to-known-good answer built from the caller's actual
/// context numbers. Used whenever the NLU path errors or returns garbage.
pub fn fallback_response(ctx: &BusinessContext, language: Option<&str>) -> IntentResult {
    let message = if language.is_some_and(|l| l.starts_with("hi")) {
        format!(
            "मैं आपकी मदद कर सकता हूं। आपके पास {} invoices हैं और {} payments pending हैं।",
            ctx.total_invoices, ctx.pending_count
        )
    } else {
        format!(
            "Hello! I can help you. You have {} invoices with {} pending payments.",
            ctx.total_invoices, ctx.pending_count
        )
    };

    IntentResult {
        intent: Intent::CheckStats,
        params: Map::new(),
        message,
        needs_confirmation: false,
        proactive_suggestion: None,
        action_result: None,
        degraded: true,
    }
}

/// Resolve free text into an intent. Collaborator failures and malformed
/// output never propagate; the caller always gets a usable result.
pub async fn resolve(
    nlu: &NluClient,
    message: &str,
    language: Option<&str>,
    ctx: &BusinessContext,
) -> IntentResult {
    let prompt = system_prompt(ctx);
    match nlu.complete(&prompt, message, None).await {
        Ok(reply) => parse_reply(&reply).unwrap_or_else(|| {
            tracing::warn!("unparsable NLU reply, using fallback");
            fallback_response(ctx, language)
        }),
        Err(err) => {
            tracing::warn!(error = %err, "NLU call failed, using fallback");
            fallback_response(ctx, language)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::context::OverdueInvoice;

    fn ctx() -> BusinessContext {
        BusinessContext {
            total_invoices: 7,
            pending_count: 3,
            total_revenue: 4200.0,
            overdue: vec![OverdueInvoice {
                invoice_no: "INV-1".into(),
                customer_name: "Ravi".into(),
                customer_phone: "+911234567890".into(),
                amount: 500.0,
                days_since_due: 40,
            }],
        }
    }

    #[test]
    fn prompt_embeds_context_numbers() {
        let prompt = system_prompt(&ctx());
        assert!(prompt.contains("7 total invoices"));
        assert!(prompt.contains("3 pending payments"));
        assert!(prompt.contains("1 invoices overdue"));
        assert!(prompt.contains("Rs 4200"));
    }

    #[test]
    fn well_formed_reply_parses() {
        let raw = r#"{"intent":"list_invoices","params":{"limit":5},"message":"ये रहे आपके invoices","needsConfirmation":false}"#;
        let result = parse_reply(raw).expect("should parse");
        assert_eq!(result.intent, Intent::ListInvoices);
        assert_eq!(result.params["limit"], 5);
        assert!(!result.needs_confirmation);
        assert!(!result.degraded);
    }

    #[test]
    fn non_json_reply_is_rejected() {
        assert!(parse_reply("Sure! Here are your invoices.").is_none());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        assert!(parse_reply(r#"{"params":{},"message":"hi"}"#).is_none());
        assert!(parse_reply(r#"{"intent":"check_stats","params":{}}"#).is_none());
    }

    #[test]
    fn unknown_intent_is_forwarded_not_rejected() {
        let raw = r#"{"intent":"book_flight","message":"ok"}"#;
        let result = parse_reply(raw).expect("unknown intent still parses");
        assert_eq!(result.intent, Intent::Unrecognized("book_flight".into()));
    }

    #[test]
    fn fallback_uses_real_context_numbers() {
        let result = fallback_response(&ctx(), None);
        assert_eq!(result.intent, Intent::CheckStats);
        assert!(!result.needs_confirmation);
        assert!(result.degraded);
        assert!(result.message.contains('7'));
        assert!(result.message.contains('3'));
    }

    #[test]
    fn fallback_message_is_hindi_for_hindi_locale() {
        let result = fallback_response(&ctx(), Some("hi"));
        assert!(result.message.contains("मदद"));
    }
}
