pub mod audit_logs;
pub mod customers;
pub mod invoices;
pub mod reminders;
pub mod users;
