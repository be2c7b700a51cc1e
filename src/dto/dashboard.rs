use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_invoices: i64,
    pub pending_payments: i64,
    pub total_customers: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusBreakdown {
    pub paid: i64,
    pub pending: i64,
    pub overdue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Analytics {
    pub revenue_by_month: BTreeMap<String, f64>,
    pub status_breakdown: StatusBreakdown,
    pub total_revenue: f64,
}
