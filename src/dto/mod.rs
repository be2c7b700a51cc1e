pub mod agent;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod invoices;
