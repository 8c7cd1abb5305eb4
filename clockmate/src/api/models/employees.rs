//! API request/response models for the admin employee views.

use crate::{
    api::extract::StringOrNumber,
    db::models::employees::EmployeeDBResponse,
    timestamps::sql_datetime,
    types::{EmployeeId, Role},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// An account waiting for approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PendingEmployee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    #[serde(with = "sql_datetime")]
    #[schema(value_type = String, example = "2025-03-04 08:00:00")]
    pub created_at: NaiveDateTime,
}

impl From<EmployeeDBResponse> for PendingEmployee {
    fn from(db: EmployeeDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            created_at: db.created_at,
        }
    }
}

/// An employee account in the admin roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeResponse {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Approval flag: true while the account may log in
    pub status: bool,
    #[serde(with = "sql_datetime")]
    #[schema(value_type = String, example = "2025-03-04 08:00:00")]
    pub created_at: NaiveDateTime,
}

impl From<EmployeeDBResponse> for EmployeeResponse {
    fn from(db: EmployeeDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            role: db.role,
            status: db.is_approved,
            created_at: db.created_at,
        }
    }
}

/// Query parameters of `GET admin/employees`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListEmployeesQuery {
    /// Also list deactivated (unapproved) employees: `true` or `1`
    pub include_inactive: Option<String>,
}

impl ListEmployeesQuery {
    pub fn include_inactive(&self) -> bool {
        matches!(self.include_inactive.as_deref(), Some("true" | "1"))
    }
}

/// Body of `POST admin/reset-pin/{id}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPinRequest {
    #[schema(value_type = Option<String>, example = "123456")]
    pub new_pin: Option<StringOrNumber>,
}
