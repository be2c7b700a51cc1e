use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        agent::{ChatRequest, TranscriptionResponse, VoiceWebhookRequest, VoiceWebhookResponse},
        auth::{LoginRequest, LoginResponse, SignupRequest, UserPublic},
        customers::{CreateCustomerRequest, CustomerList},
        dashboard::{Analytics, DashboardStats, StatusBreakdown},
        invoices::{CreateInvoiceRequest, InvoiceList, UpdateInvoiceStatusRequest},
    },
    models::{Customer, Invoice, InvoiceItem, Reminder, User},
    response::{ApiResponse, Meta},
    routes::{agent, auth, customers, dashboard, health, invoices, voice},
    services::reminder_service::ReminderOutcome,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::login,
        dashboard::stats,
        dashboard::analytics,
        invoices::list_invoices,
        invoices::create_invoice,
        invoices::get_invoice,
        invoices::update_status,
        invoices::delete_invoice,
        customers::list_customers,
        customers::add_customer,
        agent::chat,
        agent::remind,
        voice::transcribe,
        voice::webhook
    ),
    components(
        schemas(
            User,
            UserPublic,
            Invoice,
            InvoiceItem,
            Customer,
            Reminder,
            SignupRequest,
            LoginRequest,
            LoginResponse,
            CreateInvoiceRequest,
            UpdateInvoiceStatusRequest,
            InvoiceList,
            CreateCustomerRequest,
            CustomerList,
            DashboardStats,
            StatusBreakdown,
            Analytics,
            ChatRequest,
            ReminderOutcome,
            TranscriptionResponse,
            VoiceWebhookRequest,
            VoiceWebhookResponse,
            Meta,
            ApiResponse<Invoice>,
            ApiResponse<InvoiceList>,
            ApiResponse<Customer>,
            ApiResponse<CustomerList>,
            ApiResponse<DashboardStats>,
            ApiResponse<Analytics>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Signup and login"),
        (name = "Dashboard", description = "Aggregates and analytics"),
        (name = "Invoices", description = "Invoice CRUD"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Agent", description = "Natural-language agent and reminders"),
        (name = "Voice", description = "Transcription and telephony webhook"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
