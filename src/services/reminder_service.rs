use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    clients::ClientError,
    entity::{
        invoices,
        reminders::ActiveModel as ReminderActive,
        users::Entity as Users,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    services::invoice_service,
    state::AppState,
};

pub const DEFAULT_BUSINESS_NAME: &str = "Bharat Biz";

/// Result of a reminder attempt. `success` is only true when the provider
/// accepted the message; "logged, not sent" and provider failures both come
/// back success=false without raising.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReminderOutcome {
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Bilingual payment nudge sent over WhatsApp.
pub fn compose_message(
    customer_name: &str,
    amount: f64,
    invoice_no: &str,
    business_name: &str,
) -> String {
    format!(
        "नमस्ते {customer_name},\n\nYour payment of ₹{amount} for Invoice #{invoice_no} is pending.\n\nकृपया जल्द से जल्द भुगतान करें।\n\nThank you!\n- {business_name}"
    )
}

/// Send a payment reminder for an invoice owned by `user`. Missing invoice is
/// the only hard failure; provider trouble degrades into the outcome.
pub async fn send_reminder(
    state: &AppState,
    user: &AuthUser,
    invoice_no: &str,
) -> AppResult<ReminderOutcome> {
    let invoice = invoice_service::find_scoped(&state.orm, user.user_id, invoice_no).await?;

    let business_name = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .map(|u| u.business_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string());

    deliver_for_invoice(state, &invoice, &business_name).await
}

/// Delivery core shared by the reminder endpoint and the voice adapter.
pub async fn deliver_for_invoice(
    state: &AppState,
    invoice: &invoices::Model,
    business_name: &str,
) -> AppResult<ReminderOutcome> {
    let body = compose_message(
        &invoice.customer_name,
        invoice.amount,
        &invoice.invoice_no,
        business_name,
    );

    if state.messaging.is_configured() {
        match state
            .messaging
            .send_whatsapp(&invoice.customer_phone, &body)
            .await
        {
            Ok(()) => Ok(ReminderOutcome {
                message: "Payment reminder sent successfully via WhatsApp!".to_string(),
                success: true,
                details: Some(format!(
                    "Sent to {} at {}",
                    invoice.customer_name, invoice.customer_phone
                )),
                error: None,
            }),
            Err(ClientError::Provider(detail)) => {
                tracing::warn!(invoice_no = %invoice.invoice_no, "WhatsApp provider rejected send");
                Ok(ReminderOutcome {
                    message: "WhatsApp send failed.".to_string(),
                    success: false,
                    details: None,
                    error: Some(detail),
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, invoice_no = %invoice.invoice_no, "WhatsApp send errored");
                Ok(ReminderOutcome {
                    message: "Error sending WhatsApp.".to_string(),
                    success: false,
                    details: None,
                    error: Some(err.to_string()),
                })
            }
        }
    } else {
        // No live credentials: keep an audit trail instead of sending.
        ReminderActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(invoice.user_id),
            invoice_no: Set(invoice.invoice_no.clone()),
            customer_name: Set(invoice.customer_name.clone()),
            customer_phone: Set(invoice.customer_phone.clone()),
            amount: Set(invoice.amount),
            method: Set("whatsapp".to_string()),
            status: Set("pending".to_string()),
            sent_at: NotSet,
        }
        .insert(&state.orm)
        .await?;

        Ok(ReminderOutcome {
            message: "Reminder logged (configure Twilio auth token to send via WhatsApp)"
                .to_string(),
            success: false,
            details: None,
            error: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_customer_amount_and_sender() {
        let body = compose_message("Ravi", 1500.0, "INV-42", "Sharma Traders");
        assert!(body.contains("Ravi"));
        assert!(body.contains("₹1500"));
        assert!(body.contains("INV-42"));
        assert!(body.contains("Sharma Traders"));
        // Bilingual: both scripts present.
        assert!(body.contains("नमस्ते"));
        assert!(body.contains("Your payment"));
    }
}
