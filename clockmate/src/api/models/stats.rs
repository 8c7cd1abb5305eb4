//! API response model for the admin dashboard counters.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Approved employee accounts
    pub total_employees: i64,
    /// Employees with at least one clock event today
    pub active_employees: i64,
    /// Employee accounts waiting for approval
    pub pending_approvals: i64,
    /// Clock-in events recorded today
    pub today_clock_ins: i64,
}
