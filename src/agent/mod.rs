use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub mod context;
pub mod executor;
pub mod resolver;
pub mod voice;

/// Closed vocabulary of business actions a user message can request. Labels
/// coming back from the NLU collaborator are mapped into this enum at the
/// boundary; anything outside the vocabulary is carried as `Unrecognized`
/// with the raw label preserved for the response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    CreateInvoice,
    CheckStats,
    SendReminder,
    ListInvoices,
    CheckPending,
    ListOverdue,
    Unrecognized(String),
}

impl Intent {
    pub fn from_label(label: &str) -> Self {
        match label {
            "create_invoice" => Intent::CreateInvoice,
            "check_stats" => Intent::CheckStats,
            "send_reminder" => Intent::SendReminder,
            "list_invoices" => Intent::ListInvoices,
            "check_pending" => Intent::CheckPending,
            "list_overdue" => Intent::ListOverdue,
            other => Intent::Unrecognized(other.to_string()),
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Intent::CreateInvoice => "create_invoice",
            Intent::CheckStats => "check_stats",
            Intent::SendReminder => "send_reminder",
            Intent::ListInvoices => "list_invoices",
            Intent::CheckPending => "check_pending",
            Intent::ListOverdue => "list_overdue",
            Intent::Unrecognized(raw) => raw,
        }
    }
}

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_label())
    }
}

impl<'de> Deserialize<'de> for Intent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Intent::from_label(&label))
    }
}

/// Aggregate numbers attached to a `check_stats` answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_revenue: f64,
    pub total_invoices: i64,
    pub pending_payments: i64,
    pub overdue_payments: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub id: String,
    pub customer_name: String,
    pub amount: f64,
    pub status: String,
    pub date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueSummary {
    pub id: String,
    pub customer_name: String,
    pub amount: f64,
    pub days_since_due: i64,
}

/// Intent-specific payload attached by the executor. Serialized untagged so
/// the wire shape stays a plain object per intent.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    Stats(StatsSnapshot),
    Invoices { invoices: Vec<InvoiceSummary> },
    Overdue { invoices: Vec<OverdueSummary> },
}

/// Resolved intent plus everything the chat endpoint returns. `degraded`
/// records that the NLU path failed and the deterministic fallback was
/// substituted; it stays out of the wire contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub intent: Intent,
    pub params: Map<String, Value>,
    pub message: String,
    pub needs_confirmation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proactive_suggestion: Option<String>,
    pub action_result: Option<ActionResult>,
    #[serde(skip)]
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_round_trip() {
        for label in [
            "create_invoice",
            "check_stats",
            "send_reminder",
            "list_invoices",
            "check_pending",
            "list_overdue",
        ] {
            let intent = Intent::from_label(label);
            assert!(!matches!(intent, Intent::Unrecognized(_)));
            assert_eq!(intent.as_label(), label);
        }
    }

    #[test]
    fn unknown_label_is_preserved() {
        let intent = Intent::from_label("order_pizza");
        assert_eq!(intent, Intent::Unrecognized("order_pizza".into()));
        assert_eq!(intent.as_label(), "order_pizza");
        assert_eq!(
            serde_json::to_value(&intent).unwrap(),
            serde_json::json!("order_pizza")
        );
    }
}
