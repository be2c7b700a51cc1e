pub mod auth_service;
pub mod customer_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod reminder_service;
